use std::fmt;

use gspell_frame::FrameError;

/// The worker channel an error was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerChannel {
    Output,
    Diagnostics,
}

impl fmt::Display for WorkerChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerChannel::Output => f.write_str("output"),
            WorkerChannel::Diagnostics => f.write_str("diagnostics"),
        }
    }
}

/// Fatal errors that end a spell-checking session.
///
/// Non-fatal conditions (unreadable sources, unrecognized worker lines) are
/// reported to the diagnostic stream and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error(transparent)]
    Transport(#[from] gspell_transport::TransportError),

    /// Sending a frame to the worker failed; the worker is assumed gone.
    #[error("error writing to worker: {0}")]
    WriteToWorker(#[source] FrameError),

    /// Reading from a worker channel failed.
    #[error("error reading from worker {channel}: {source}")]
    ReadFromWorker {
        channel: WorkerChannel,
        source: FrameError,
    },

    /// A worker channel closed in the middle of the protocol.
    #[error("premature end from worker {channel}")]
    PrematureEnd { channel: WorkerChannel },

    /// The worker reported it cannot open a resource it needs.
    #[error("{resource}: cannot open")]
    CannotOpen { resource: String },

    /// Reading an input source failed after it was opened.
    #[error("{name}: error reading line: {source}")]
    SourceRead {
        name: String,
        source: std::io::Error,
    },

    /// Writing reports or diagnostics failed.
    #[error("error writing output: {0}")]
    Output(#[source] std::io::Error),
}

impl SessionError {
    pub(crate) fn from_read(channel: WorkerChannel, err: FrameError) -> Self {
        match err {
            FrameError::ConnectionClosed => SessionError::PrematureEnd { channel },
            source => SessionError::ReadFromWorker { channel, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
