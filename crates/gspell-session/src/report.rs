use std::io::{self, Write};

use gspell_frame::{plain_string, Misspelling};
use serde::Serialize;

use crate::config::{ReportFlags, ReportFormat};

/// One misspelled word, attributed to its source and line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub file: String,
    pub line: usize,
    pub word: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Report {
    /// Attribute a parsed misspelling to `file` and 1-based `line`.
    pub fn new(file: &str, line: usize, misspelling: &Misspelling<'_>) -> Self {
        Self {
            file: file.to_string(),
            line,
            word: plain_string(misspelling.word),
            kind: misspelling.kind.as_str(),
            offset: misspelling.offset,
            suggestions: misspelling
                .suggestions
                .iter()
                .map(|s| plain_string(s))
                .collect(),
        }
    }

    /// Write in the classic text form: `[name:][N: ]word`.
    ///
    /// With only file names enabled, a space separates the name from the
    /// word.
    pub fn write_text(&self, flags: ReportFlags, out: &mut dyn Write) -> io::Result<()> {
        if flags.file_names {
            write!(out, "{}:", self.file)?;
            if !flags.line_numbers {
                out.write_all(b" ")?;
            }
        }
        if flags.line_numbers {
            write!(out, "{}: ", self.line)?;
        }
        writeln!(out, "{}", self.word)
    }

    /// Write as a single JSON object followed by a newline.
    pub fn write_json(&self, out: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        out.write_all(b"\n")
    }

    /// Write in the selected format.
    pub fn write(
        &self,
        format: ReportFormat,
        flags: ReportFlags,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        match format {
            ReportFormat::Text => self.write_text(flags, out),
            ReportFormat::Json => self.write_json(out),
        }
    }
}
