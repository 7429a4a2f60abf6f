mod check;
mod exit;
mod locate;
mod logging;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use gspell_session::{sources_from_args, ReportFlags, ReportFormat, SessionConfig};
use gspell_transport::{Dictionary, WorkerConfig};
use tracing::debug;

use crate::exit::{CliError, CliResult, FAILURE, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// One word per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "gspell",
    about = "This is GNU Spell, a Unix spell emulator.",
    disable_version_flag = true
)]
struct Cli {
    /// Print Ispell's version.
    #[arg(short = 'I', long)]
    ispell_version: bool,

    /// Print the version number.
    #[arg(short = 'V', long)]
    version: bool,

    /// Use the British dictionary.
    #[arg(short = 'b', long)]
    british: bool,

    /// Use FILE to look up words.
    #[arg(short = 'd', long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Calls PROGRAM as Ispell.
    #[arg(short = 'i', long, value_name = "PROGRAM", env = "GSPELL_ISPELL")]
    ispell: Option<PathBuf>,

    /// Ignored; for compatibility.
    #[arg(short = 'l', long)]
    all_chains: bool,

    /// Print line numbers before lines.
    #[arg(short = 'n', long)]
    number: bool,

    /// Print file names before lines.
    #[arg(short = 'o', long)]
    print_file_name: bool,

    /// Ignored; for compatibility.
    #[arg(short = 's', long, value_name = "FILE")]
    stop_list: Option<PathBuf>,

    /// Print words not literally found.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Ignored; for compatibility.
    #[arg(short = 'x', long)]
    print_stems: bool,

    /// Report format (stdout).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LogLevel,

    /// Files to check; `-` is standard input.
    #[arg(value_name = "FILE")]
    files: Vec<OsString>,
}

impl Cli {
    fn dictionary(&self) -> Dictionary {
        match (&self.dictionary, self.british) {
            (Some(path), _) => Dictionary::Personal(path.clone()),
            (None, true) => Dictionary::British,
            (None, false) => Dictionary::Default,
        }
    }

    fn session_config(&self, program_name: &str, engine: &Path) -> SessionConfig {
        SessionConfig {
            program_name: program_name.to_string(),
            worker_name: engine.display().to_string(),
            verbose: self.verbose,
            report: ReportFlags {
                file_names: self.print_file_name,
                line_numbers: self.number,
            },
            format: self.format.into(),
            version_only: self.ispell_version,
        }
    }
}

fn program_name(argv0: Option<&OsString>) -> String {
    argv0
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gspell".to_string())
}

fn run(cli: Cli, program: &str) -> CliResult<i32> {
    if cli.version {
        eprintln!("{program}: version {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }
    if cli.all_chains || cli.print_stems || cli.stop_list.is_some() {
        debug!("ignoring compatibility options");
    }

    let engine = match &cli.ispell {
        Some(engine) => engine.clone(),
        None => locate::locate_engine(std::env::var_os("PATH").as_deref())
            .ok_or_else(|| CliError::failure("unable to locate Ispell"))?,
    };

    let worker = WorkerConfig::new(&engine).with_dictionary(cli.dictionary());
    let config = cli.session_config(program, &engine);
    let sources = sources_from_args(&cli.files);

    check::run(&worker, &config, &sources)
}

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    let program = program_name(args.first());

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { FAILURE } else { SUCCESS };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_logging(cli.log_format, cli.log_level);

    match run(cli, &program) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{program}: {err}");
            std::process::exit(err.code);
        }
    }
}
