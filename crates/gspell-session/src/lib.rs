//! Spell-checking session that drives an `ispell -a` worker.
//!
//! This layer ties the pieces together: input sources are streamed line by
//! line to the worker, its correction protocol is interpreted into reports,
//! and its diagnostic channel is relayed without ever blocking the session.

pub mod config;
#[cfg(unix)]
pub mod drain;
pub mod error;
pub mod interpreter;
pub mod report;
#[cfg(unix)]
pub mod session;
pub mod source;

pub use config::{ReportFlags, ReportFormat, SessionConfig};
#[cfg(unix)]
pub use drain::{ErrorDrain, CANNOT_OPEN_PREFIX};
pub use error::{Result, SessionError, WorkerChannel};
pub use interpreter::{Request, ResponseInterpreter};
pub use report::Report;
#[cfg(unix)]
pub use session::{Banner, Console, Outcome, Session, SessionState};
pub use source::{open_file, sources_from_args, Source, STDIN_NAME};
