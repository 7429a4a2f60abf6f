use std::io::{Read, Write};

use gspell_frame::{parse_misspelling, LineBuffer, LineReader, ResponseKind};
use tracing::{debug, trace};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError, WorkerChannel};
use crate::report::Report;

/// Where the line being answered came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Source name (`-` for standard input).
    pub source: &'a str,
    /// 1-based line number within the source.
    pub line: usize,
}

/// Reads and classifies the worker's correction protocol.
pub struct ResponseInterpreter<O> {
    reader: LineReader<O>,
    line: LineBuffer,
}

impl<O: Read> ResponseInterpreter<O> {
    /// Create an interpreter over the worker's output channel.
    pub fn new(channel: O) -> Self {
        Self {
            reader: LineReader::new(channel),
            line: LineBuffer::new(),
        }
    }

    /// Read the worker's startup banner line.
    pub fn read_banner(&mut self) -> Result<&LineBuffer> {
        self.line.reset();
        self.reader
            .read_line(&mut self.line)
            .map_err(|err| SessionError::from_read(WorkerChannel::Output, err))?;
        Ok(&self.line)
    }

    /// Read the complete response to one submitted line.
    ///
    /// Consumes lines up to and including the blank terminator and nothing
    /// beyond it. Misspellings are returned in the order the worker reported
    /// them; `?` lines count only in verbose mode. Unrecognized lines are
    /// reported on `diagnostics` and skipped.
    pub fn interpret(
        &mut self,
        config: &SessionConfig,
        request: &Request<'_>,
        diagnostics: &mut dyn Write,
    ) -> Result<Vec<Report>> {
        let mut reports = Vec::new();

        loop {
            self.line.reset();
            self.reader
                .read_line(&mut self.line)
                .map_err(|err| SessionError::from_read(WorkerChannel::Output, err))?;

            let kind = ResponseKind::classify(self.line.as_bytes());
            trace!(?kind, line = request.line, "worker response");

            match kind {
                ResponseKind::Terminator => break,
                kind if kind.is_accepted() => continue,
                ResponseKind::Guess if !config.verbose => continue,
                kind if kind.is_misspelling() => {
                    if let Some(misspelling) = parse_misspelling(self.line.as_bytes()) {
                        reports.push(Report::new(request.source, request.line, &misspelling));
                    }
                }
                _ => {
                    let text = self.line.to_plain_string();
                    let text = text.trim_end_matches(['\n', '\r']);
                    debug!(line = %text, "unrecognized worker line");
                    writeln!(
                        diagnostics,
                        "{}: unrecognized worker line `{text}'",
                        config.program_name
                    )
                    .map_err(SessionError::Output)?;
                }
            }
        }

        debug!(
            source = request.source,
            line = request.line,
            misspellings = reports.len(),
            "response complete"
        );
        Ok(reports)
    }

    /// Borrow the underlying line reader.
    pub fn reader(&self) -> &LineReader<O> {
        &self.reader
    }

    /// Consume the interpreter and return its line reader.
    pub fn into_reader(self) -> LineReader<O> {
        self.reader
    }
}

impl<O> std::fmt::Debug for ResponseInterpreter<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseInterpreter")
            .field("reader", &self.reader)
            .finish()
    }
}
