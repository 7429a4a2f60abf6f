//! A Unix `spell` emulator that drives `ispell -a` through pipes.
//!
//! # Crate Structure
//!
//! - [`transport`]: Pipes to the worker, readiness polling, worker launch
//! - [`frame`]: Line buffer and the `ispell -a` line protocol
//! - [`session`]: Error drain, response interpreter, session orchestrator

/// Re-export transport types.
pub mod transport {
    pub use gspell_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use gspell_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use gspell_session::*;
}
