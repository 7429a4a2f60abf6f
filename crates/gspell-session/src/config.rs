/// Which annotations prefix each reported word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFlags {
    /// Prefix with the source name (`name:`).
    pub file_names: bool,
    /// Prefix with the 1-based line number (`N: `).
    pub line_numbers: bool,
}

/// How reports are written to standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One word per line, optionally annotated (classic `spell` output).
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Immutable settings for one spell-checking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Prefix for the controller's own diagnostics.
    pub program_name: String,
    /// Prefix for diagnostics relayed from the worker.
    pub worker_name: String,
    /// Also report words the worker only matched by guessing a root.
    pub verbose: bool,
    /// Annotations for text reports.
    pub report: ReportFlags,
    /// Output format for reports.
    pub format: ReportFormat,
    /// Print the worker's version and stop before reading any input.
    pub version_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            program_name: "gspell".to_string(),
            worker_name: "ispell".to_string(),
            verbose: false,
            report: ReportFlags::default(),
            format: ReportFormat::Text,
            version_only: false,
        }
    }
}
