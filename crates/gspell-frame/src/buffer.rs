use std::io::{self, BufRead, ErrorKind};

use bytes::BytesMut;

/// Always grow by at least this many bytes.
pub const MIN_CHUNK: usize = 64;

/// Outcome of reading one line into a [`LineBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// A full line, terminator included, was appended.
    Complete,
    /// End of input was reached. Whatever partial line preceded it (possibly
    /// nothing) was appended.
    Eof,
}

/// Growable byte buffer that accumulates one logical line at a time.
///
/// The buffer is reset and reused between lines so the allocation survives
/// across iterations of the main loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    /// Create an empty buffer with room for one minimum growth step.
    pub fn new() -> Self {
        Self::with_capacity(MIN_CHUNK)
    }

    /// Create an empty buffer with at least `capacity` bytes allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Clear the content, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Allocated size; never less than [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Content, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Content with a trailing `\n` (and a `\r` before it) removed.
    pub fn trimmed(&self) -> &[u8] {
        let bytes = self.as_bytes();
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }

    /// Append one byte, growing by at least [`MIN_CHUNK`] when full.
    pub fn push(&mut self, byte: u8) {
        self.grow_for(1);
        self.buf.extend_from_slice(&[byte]);
    }

    /// Append `bytes`, growing by at least [`MIN_CHUNK`] when needed.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.grow_for(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    /// True when the last byte is `\n`.
    pub fn ends_with_newline(&self) -> bool {
        self.buf.last() == Some(&b'\n')
    }

    /// Append a `\n` unless the content already ends with one.
    pub fn ensure_newline(&mut self) {
        if !self.ends_with_newline() {
            self.push(b'\n');
        }
    }

    /// Append one line from a buffered stream, terminator included.
    ///
    /// Interrupted reads are retried.
    pub fn read_line_from<R: BufRead + ?Sized>(&mut self, src: &mut R) -> io::Result<LineStatus> {
        loop {
            let available = match src.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            if available.is_empty() {
                return Ok(LineStatus::Eof);
            }

            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.extend_from_slice(&available[..=pos]);
                    src.consume(pos + 1);
                    return Ok(LineStatus::Complete);
                }
                None => {
                    let taken = available.len();
                    self.extend_from_slice(available);
                    src.consume(taken);
                }
            }
        }
    }

    /// Plain-string form. NUL bytes become spaces and invalid UTF-8 is
    /// replaced.
    pub fn to_plain_string(&self) -> String {
        plain_string(self.as_bytes())
    }

    fn grow_for(&mut self, additional: usize) {
        let spare = self.buf.capacity() - self.buf.len();
        if additional > spare {
            self.buf.reserve(additional.max(MIN_CHUNK));
        }
    }
}

impl From<&str> for LineBuffer {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl From<&[u8]> for LineBuffer {
    fn from(value: &[u8]) -> Self {
        let mut line = Self::with_capacity(value.len().max(MIN_CHUNK));
        line.extend_from_slice(value);
        line
    }
}

/// Convert raw bytes to a `String`, mapping NUL to space.
pub fn plain_string(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.contains('\0') {
        text.replace('\0', " ")
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use super::*;

    #[test]
    fn length_never_exceeds_capacity() {
        let mut line = LineBuffer::new();
        for i in 0..1000u32 {
            line.push(b'a' + (i % 26) as u8);
            assert!(line.len() <= line.capacity());
        }
        line.extend_from_slice(&[b'z'; 4096]);
        assert!(line.len() <= line.capacity());
        assert_eq!(line.len(), 5096);
    }

    #[test]
    fn grows_by_at_least_min_chunk() {
        let mut line = LineBuffer::with_capacity(0);
        line.push(b'x');
        assert!(line.capacity() >= MIN_CHUNK);
    }

    #[test]
    fn reset_keeps_allocation() {
        let mut line = LineBuffer::new();
        line.extend_from_slice(&[b'q'; 500]);
        let capacity = line.capacity();
        line.reset();
        assert!(line.is_empty());
        assert_eq!(line.capacity(), capacity);
    }

    #[test]
    fn nul_bytes_become_spaces() {
        let line = LineBuffer::from(&b"a\0b\0"[..]);
        assert_eq!(line.to_plain_string(), "a b ");
    }

    #[test]
    fn ensure_newline_appends_only_when_missing() {
        let mut line = LineBuffer::from("no newline");
        line.ensure_newline();
        assert_eq!(line.as_bytes(), b"no newline\n");
        line.ensure_newline();
        assert_eq!(line.as_bytes(), b"no newline\n");
    }

    #[test]
    fn trimmed_strips_lf_and_crlf() {
        assert_eq!(LineBuffer::from("word\n").trimmed(), b"word");
        assert_eq!(LineBuffer::from("word\r\n").trimmed(), b"word");
        assert_eq!(LineBuffer::from("word").trimmed(), b"word");
    }

    #[test]
    fn read_line_from_stream() {
        let mut src = Cursor::new(b"first\nsecond\nlast".to_vec());
        let mut line = LineBuffer::new();

        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Complete);
        assert_eq!(line.as_bytes(), b"first\n");

        line.reset();
        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Complete);
        assert_eq!(line.as_bytes(), b"second\n");

        line.reset();
        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Eof);
        assert_eq!(line.as_bytes(), b"last");

        line.reset();
        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Eof);
        assert!(line.is_empty());
    }

    #[test]
    fn read_line_spanning_small_buffer_fills() {
        let text = "a fairly long line that will not fit in a tiny reader buffer\n";
        let mut src = BufReader::with_capacity(4, Cursor::new(text.as_bytes().to_vec()));
        let mut line = LineBuffer::new();
        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Complete);
        assert_eq!(line.as_bytes(), text.as_bytes());
    }

    #[test]
    fn read_line_retries_interrupted() {
        struct InterruptedOnce {
            interrupted: bool,
            inner: Cursor<Vec<u8>>,
        }

        impl Read for InterruptedOnce {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::from(ErrorKind::Interrupted));
                }
                self.inner.read(buf)
            }
        }

        let mut src = BufReader::new(InterruptedOnce {
            interrupted: false,
            inner: Cursor::new(b"ok\n".to_vec()),
        });
        let mut line = LineBuffer::new();
        assert_eq!(line.read_line_from(&mut src).unwrap(), LineStatus::Complete);
        assert_eq!(line.as_bytes(), b"ok\n");
    }
}
