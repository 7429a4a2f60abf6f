//! Line framing for the `ispell -a` pipe protocol.
//!
//! Everything that crosses the worker channels is a newline-terminated line:
//! - outgoing frames are `^` + one line of input text + `\n`
//! - incoming response lines start with a one-byte marker
//!   (`*`, `+`, `-`, `&`, `#`, `?`) and each response ends with a blank line
//!
//! [`LineBuffer`] accumulates one line at a time, [`LineReader`] pulls whole
//! lines off a raw channel, [`FrameWriter`] pushes whole frames, and the
//! [`codec`] module classifies and parses response lines.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use buffer::{plain_string, LineBuffer, LineStatus, MIN_CHUNK};
pub use codec::{
    banner_version, encode_frame, misspelled_word, parse_misspelling, Misspelling, ResponseKind,
    FRAME_PREFIX, WORD_OFFSET,
};
pub use error::{FrameError, Result};
pub use reader::LineReader;
pub use writer::FrameWriter;
