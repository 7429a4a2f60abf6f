use std::io;

use gspell_session::{Console, Outcome, Session, SessionConfig, Source};
use gspell_transport::{launch, ChannelSet, ControllerEnds, WorkerConfig};
use tracing::{debug, info};

use crate::exit::{CliError, CliResult, SUCCESS};

/// Spell-check `sources` with a freshly launched worker.
///
/// Reports go to stdout; diagnostics, relayed worker output included, go to
/// stderr. The worker is reaped once its input has been closed.
pub fn run(worker: &WorkerConfig, config: &SessionConfig, sources: &[Source]) -> CliResult<i32> {
    let channels = ChannelSet::establish()?;
    let mut handle = launch(channels, worker)?;
    let pid = handle.id();
    let ControllerEnds {
        input,
        output,
        errors,
    } = handle
        .take_channels()
        .ok_or_else(|| CliError::failure("worker channels unavailable"))?;

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut reports = io::stdout().lock();
    let mut diagnostics = io::stderr().lock();

    let outcome = {
        let mut console = Console {
            reports: &mut reports,
            diagnostics: &mut diagnostics,
        };
        let mut session = Session::new(config, input, output, errors);
        session.run(sources, &mut stdin, &mut console)
    }?;

    match outcome {
        Outcome::VersionShown => debug!(pid, "engine version shown"),
        Outcome::Completed {
            lines,
            misspellings,
        } => info!(pid, lines, misspellings, "check complete"),
    }

    let status = handle.wait()?;
    if !status.success() {
        debug!(%status, "worker exited unsuccessfully after session");
    }

    Ok(SUCCESS)
}
