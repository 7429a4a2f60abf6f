/// Errors that can occur while reading or writing worker lines.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred on the channel.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed before a complete line was transferred.
    #[error("connection closed (incomplete line)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
