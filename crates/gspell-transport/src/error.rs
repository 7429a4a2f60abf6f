use std::path::PathBuf;

/// Errors that can occur while wiring up or talking to the worker process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to create one of the worker pipes.
    #[error("error creating pipe to worker: {0}")]
    Pipe(std::io::Error),

    /// Failed to spawn or execute the worker program.
    #[error("error executing {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// The readiness check on a channel failed.
    #[error("error polling worker channel: {0}")]
    Poll(std::io::Error),

    /// Failed to reap the worker process.
    #[error("error waiting for worker: {0}")]
    Wait(std::io::Error),

    /// An I/O error occurred on a channel endpoint.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
