use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Name used for standard input, both on the command line and in reports.
pub const STDIN_NAME: &str = "-";

/// One input source named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// `-` is standard input; anything else is a path.
    pub fn from_arg(arg: impl AsRef<OsStr>) -> Self {
        let arg = arg.as_ref();
        if arg == STDIN_NAME {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    /// Name used in reports and diagnostics.
    pub fn name(&self) -> String {
        match self {
            Source::Stdin => STDIN_NAME.to_string(),
            Source::Path(path) => path.display().to_string(),
        }
    }
}

/// Sources for a run: every argument in order, or standard input alone when
/// there are none.
pub fn sources_from_args<I, S>(args: I) -> Vec<Source>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let sources: Vec<Source> = args.into_iter().map(Source::from_arg).collect();
    if sources.is_empty() {
        vec![Source::Stdin]
    } else {
        sources
    }
}

/// Open a file source for reading.
///
/// Problems are per-source and non-fatal: they are reported on
/// `diagnostics` as `<program>: <path>: <reason>` and `Ok(None)` is
/// returned so the caller moves on. Only a failure to write the diagnostic
/// is an error.
pub fn open_file(
    path: &Path,
    program_name: &str,
    diagnostics: &mut dyn Write,
) -> io::Result<Option<BufReader<File>>> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "stat failed");
            writeln!(
                diagnostics,
                "{program_name}: {}: stat error: {err}",
                path.display()
            )?;
            return Ok(None);
        }
    };

    if metadata.is_dir() {
        debug!(path = %path.display(), "skipping directory");
        writeln!(diagnostics, "{program_name}: {}: is a directory", path.display())?;
        return Ok(None);
    }

    match File::open(path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "open failed");
            writeln!(
                diagnostics,
                "{program_name}: {}: open error: {err}",
                path.display()
            )?;
            Ok(None)
        }
    }
}
