use std::io::{BufRead, Read, Write};
use std::os::fd::AsFd;

use gspell_frame::{banner_version, plain_string, FrameWriter, LineBuffer, LineStatus};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::drain::ErrorDrain;
use crate::error::{Result, SessionError};
use crate::interpreter::{Request, ResponseInterpreter};
use crate::source::{open_file, Source, STDIN_NAME};

/// Where reports and diagnostics go.
pub struct Console<'w> {
    /// Misspelling reports (standard output).
    pub reports: &'w mut dyn Write,
    /// The controller's own diagnostics and relayed worker diagnostics
    /// (standard error).
    pub diagnostics: &'w mut dyn Write,
}

/// The worker's startup banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    /// Version token, e.g. `3.1.20`. Empty when the banner has none.
    pub version: String,
}

/// Position of the session within its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current source name (`-` for standard input).
    pub source: String,
    /// 1-based number of the last line sent from the current source.
    pub line_number: usize,
    /// Standard input is single-use across the whole run.
    pub stdin_consumed: bool,
}

/// How a run ended when it ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Only the worker version was requested and printed.
    VersionShown,
    /// All sources were processed.
    Completed { lines: usize, misspellings: usize },
}

/// Drives one worker through a whole run.
///
/// Requests are strictly sequential: each line is fully answered, up to the
/// worker's blank terminator, before the next one is sent. Diagnostics are
/// drained right before and right after every request. Dropping the session
/// closes the worker's input.
pub struct Session<'c, I, O, E> {
    config: &'c SessionConfig,
    writer: FrameWriter<I>,
    interpreter: ResponseInterpreter<O>,
    drain: ErrorDrain<E>,
    state: SessionState,
    line: LineBuffer,
    lines: usize,
    misspellings: usize,
}

impl<'c, I, O, E> Session<'c, I, O, E>
where
    I: Write,
    O: Read,
    E: Read + AsFd,
{
    /// Build a session over the controller-side channel endpoints.
    pub fn new(config: &'c SessionConfig, input: I, output: O, errors: E) -> Self {
        Self {
            config,
            writer: FrameWriter::new(input),
            interpreter: ResponseInterpreter::new(output),
            drain: ErrorDrain::new(errors),
            state: SessionState::default(),
            line: LineBuffer::new(),
            lines: 0,
            misspellings: 0,
        }
    }

    /// Current source and line position.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Consume the worker's startup banner.
    pub fn start(&mut self, console: &mut Console<'_>) -> Result<Banner> {
        self.drain
            .drain(&self.config.worker_name, console.diagnostics)?;

        let banner = match self.interpreter.read_banner() {
            Ok(banner) => banner,
            Err(err) => return Err(self.explain(err, console)),
        };

        let text = plain_string(banner.trimmed());
        let version = plain_string(banner_version(banner.as_bytes()));
        info!(%version, "worker started");

        Ok(Banner { text, version })
    }

    /// Run the whole session: banner, then every source in order.
    pub fn run(
        &mut self,
        sources: &[Source],
        stdin: &mut dyn BufRead,
        console: &mut Console<'_>,
    ) -> Result<Outcome> {
        let banner = self.start(console)?;

        if self.config.version_only {
            writeln!(
                console.reports,
                "{}: Ispell version {}",
                self.config.program_name, banner.version
            )
            .map_err(SessionError::Output)?;
            return Ok(Outcome::VersionShown);
        }

        for source in sources {
            match source {
                Source::Stdin => {
                    if self.state.stdin_consumed {
                        debug!("standard input already consumed; skipping");
                        continue;
                    }
                    self.state.stdin_consumed = true;
                    self.check_source(STDIN_NAME, stdin, console)?;
                }
                Source::Path(path) => {
                    let opened =
                        open_file(path, &self.config.program_name, console.diagnostics)
                            .map_err(SessionError::Output)?;
                    let Some(mut reader) = opened else {
                        continue;
                    };
                    self.check_source(&source.name(), &mut reader, console)?;
                }
            }
        }

        console.reports.flush().map_err(SessionError::Output)?;
        info!(
            lines = self.lines,
            misspellings = self.misspellings,
            "session complete"
        );

        Ok(Outcome::Completed {
            lines: self.lines,
            misspellings: self.misspellings,
        })
    }

    /// Stream one open source through the worker, line by line.
    pub fn check_source(
        &mut self,
        name: &str,
        reader: &mut dyn BufRead,
        console: &mut Console<'_>,
    ) -> Result<()> {
        debug!(source = name, "checking source");
        self.state.source = name.to_string();
        self.state.line_number = 0;

        loop {
            self.line.reset();
            let status =
                self.line
                    .read_line_from(reader)
                    .map_err(|source| SessionError::SourceRead {
                        name: name.to_string(),
                        source,
                    })?;

            if status == LineStatus::Eof && self.line.is_empty() {
                return Ok(());
            }

            self.state.line_number += 1;
            self.line.ensure_newline();
            self.check_line(console)?;

            if status == LineStatus::Eof {
                return Ok(());
            }
        }
    }

    /// Send the buffered line and report what the worker says about it.
    fn check_line(&mut self, console: &mut Console<'_>) -> Result<()> {
        self.writer
            .send_line(self.line.as_bytes())
            .map_err(SessionError::WriteToWorker)?;

        self.drain
            .drain(&self.config.worker_name, console.diagnostics)?;

        let request = Request {
            source: &self.state.source,
            line: self.state.line_number,
        };
        let reports = match self
            .interpreter
            .interpret(self.config, &request, console.diagnostics)
        {
            Ok(reports) => reports,
            Err(err) => return Err(self.explain(err, console)),
        };

        for report in &reports {
            report
                .write(self.config.format, self.config.report, console.reports)
                .map_err(SessionError::Output)?;
        }
        // A co-process may be waiting on this answer before sending more.
        console.reports.flush().map_err(SessionError::Output)?;

        self.drain
            .drain(&self.config.worker_name, console.diagnostics)?;

        self.lines += 1;
        self.misspellings += reports.len();
        Ok(())
    }

    /// When the output channel closes early, the worker usually said why on
    /// its diagnostic channel. Prefer that explanation.
    fn explain(&mut self, err: SessionError, console: &mut Console<'_>) -> SessionError {
        if !matches!(err, SessionError::PrematureEnd { .. }) {
            return err;
        }
        match self
            .drain
            .drain(&self.config.worker_name, console.diagnostics)
        {
            Err(cause @ SessionError::CannotOpen { .. }) => cause,
            _ => err,
        }
    }

    /// Consume the session, returning the channel endpoints.
    pub fn into_channels(self) -> (I, O, E) {
        (
            self.writer.into_inner(),
            self.interpreter.into_reader().into_inner(),
            self.drain.into_reader().into_inner(),
        )
    }
}

impl<I, O, E> std::fmt::Debug for Session<'_, I, O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("lines", &self.lines)
            .field("misspellings", &self.misspellings)
            .finish()
    }
}
