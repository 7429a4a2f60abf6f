use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{debug, info, warn};

use crate::channel::{ChannelSet, ControllerEnds};
use crate::error::{Result, TransportError};

/// Name the worker sees as its `argv[0]`.
pub const WORKER_ARGV0: &str = "ispell";

/// Dictionary selection passed to the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dictionary {
    /// The worker's default dictionary; no extra flag.
    #[default]
    Default,
    /// British locale (`-d british`).
    British,
    /// A personal dictionary file (`-p <path>`).
    Personal(PathBuf),
}

/// How to start the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Path of the engine executable.
    pub program: PathBuf,
    /// Dictionary selection.
    pub dictionary: Dictionary,
}

impl WorkerConfig {
    /// Run `program` with its default dictionary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dictionary: Dictionary::Default,
        }
    }

    /// Select the dictionary passed to the worker.
    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Arguments after `argv[0]`: ask mode plus at most one dictionary flag.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("-a")];
        match &self.dictionary {
            Dictionary::Default => {}
            Dictionary::British => {
                args.push("-d".into());
                args.push("british".into());
            }
            Dictionary::Personal(path) => {
                args.push("-p".into());
                args.push(path.clone().into_os_string());
            }
        }
        args
    }
}

/// A running worker process.
///
/// Holds the controller-side endpoints until the session takes them. If the
/// handle is dropped while the worker is still running, the worker is killed
/// and reaped.
#[derive(Debug)]
pub struct Worker {
    child: Child,
    program: PathBuf,
    channels: Option<ControllerEnds>,
}

impl Worker {
    /// OS process id of the worker.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Path of the engine executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Take ownership of the controller-side endpoints.
    pub fn take_channels(&mut self) -> Option<ControllerEnds> {
        self.channels.take()
    }

    /// Close any endpoints still held and wait for the worker to exit.
    ///
    /// The worker only exits on its own once its input is closed, so the
    /// session must have released the input endpoint first.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        self.channels = None;
        let status = self.child.wait().map_err(TransportError::Wait)?;
        debug!(pid = self.child.id(), %status, "worker exited");
        Ok(status)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.channels = None;
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(pid = self.child.id(), "killing worker still running at drop");
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
            Err(err) => warn!(error = %err, "failed to query worker status"),
        }
    }
}

/// Spawn the worker on the worker-side endpoints of `channels`.
///
/// The worker's standard input, output and error are redirected onto the
/// three channels and its image is replaced with `config.program`. The
/// controller-side endpoints are close-on-exec and never reach the worker.
/// The worker-side endpoints are closed in this process before returning.
pub fn launch(channels: ChannelSet, config: &WorkerConfig) -> Result<Worker> {
    let (controller, worker_ends) = channels.split();

    let mut command = Command::new(&config.program);
    command
        .arg0(WORKER_ARGV0)
        .args(config.args())
        .stdin(Stdio::from(worker_ends.input.try_clone()?))
        .stdout(Stdio::from(worker_ends.output.try_clone()?))
        .stderr(Stdio::from(worker_ends.errors.try_clone()?));

    let spawned = command.spawn();

    // Both the command's copies and the originals must go, or the worker
    // never observes end of input.
    drop(command);
    worker_ends.close();

    let child = spawned.map_err(|source| TransportError::Spawn {
        program: config.program.clone(),
        source,
    })?;

    info!(
        pid = child.id(),
        program = %config.program.display(),
        dictionary = ?config.dictionary,
        "launched worker"
    );

    Ok(Worker {
        child,
        program: config.program.clone(),
        channels: Some(controller),
    })
}
