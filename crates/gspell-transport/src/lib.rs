//! Pipe transport between gspell and its spell-checking worker.
//!
//! Provides the three unidirectional channels (input, output, diagnostics)
//! that connect the controller to an `ispell -a` child process:
//! - [`ChannelSet`] creates the pipes and hands out both ends
//! - [`poll_readable`] is the zero-timeout readiness check used on the
//!   diagnostic channel
//! - [`launch`] spawns the worker on the worker-side ends
//!
//! This is the lowest layer of gspell. Everything else builds on top of
//! the endpoints provided here.

pub mod error;

#[cfg(unix)]
pub mod channel;
#[cfg(unix)]
pub mod launcher;
#[cfg(unix)]
pub mod poll;

pub use error::{Result, TransportError};

#[cfg(unix)]
pub use channel::{ChannelSet, ControllerEnds, WorkerEnds};
#[cfg(unix)]
pub use launcher::{launch, Dictionary, Worker, WorkerConfig, WORKER_ARGV0};
#[cfg(unix)]
pub use poll::poll_readable;
