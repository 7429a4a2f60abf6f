use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::buffer::LineBuffer;
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads newline-terminated lines from a raw channel.
///
/// Bytes read past the end of the current line are kept for the next call,
/// so callers always get complete lines.
pub struct LineReader<T> {
    inner: T,
    pending: BytesMut,
}

impl<T: Read> LineReader<T> {
    /// Create a line reader over a raw channel.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            pending: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Append the next complete line, terminator included, to `line`
    /// (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when end of stream is
    /// reached first; any partial line read before that is still appended.
    pub fn read_line(&mut self, line: &mut LineBuffer) -> Result<()> {
        loop {
            if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&self.pending[..=pos]);
                self.pending.advance(pos + 1);
                return Ok(());
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                line.extend_from_slice(&self.pending);
                self.pending.clear();
                return Err(FrameError::ConnectionClosed);
            }

            self.pending.extend_from_slice(&chunk[..read]);
        }
    }

    /// True when a complete line is already buffered and the next
    /// [`read_line`](Self::read_line) will not touch the channel.
    pub fn has_buffered_line(&self) -> bool {
        self.pending.contains(&b'\n')
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner channel.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for LineReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    #[test]
    fn reads_consecutive_lines() {
        let mut reader = LineReader::new(Cursor::new(b"& cta 1 0: cat\n\n".to_vec()));
        let mut line = LineBuffer::new();

        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"& cta 1 0: cat\n");

        line.reset();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"\n");
    }

    #[test]
    fn keeps_bytes_after_line_for_next_call() {
        let mut reader = LineReader::new(Cursor::new(b"one\ntwo\nthr".to_vec()));
        let mut line = LineBuffer::new();

        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"one\n");
        assert!(reader.has_buffered_line());

        line.reset();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"two\n");
        assert!(!reader.has_buffered_line());
    }

    #[test]
    fn end_of_stream_is_connection_closed() {
        let mut reader = LineReader::new(Cursor::new(Vec::<u8>::new()));
        let mut line = LineBuffer::new();
        let err = reader.read_line(&mut line).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
        assert!(line.is_empty());
    }

    #[test]
    fn partial_line_before_close_is_kept() {
        let mut reader = LineReader::new(Cursor::new(b"half".to_vec()));
        let mut line = LineBuffer::new();
        let err = reader.read_line(&mut line).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
        assert_eq!(line.as_bytes(), b"half");
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn partial_read_handling() {
        let mut reader = LineReader::new(ByteByByteReader {
            bytes: b"# xyzzy 0\n".to_vec(),
            pos: 0,
        });
        let mut line = LineBuffer::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"# xyzzy 0\n");
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let mut reader = LineReader::new(InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(b"*\n".to_vec()),
        });
        let mut line = LineBuffer::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line.as_bytes(), b"*\n");
    }

    #[test]
    fn other_errors_propagate() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::BrokenPipe))
            }
        }

        let mut reader = LineReader::new(Broken);
        let mut line = LineBuffer::new();
        let err = reader.read_line(&mut line).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    #[cfg(unix)]
    fn reads_across_pipe() {
        let (mut left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut reader = LineReader::new(right);

        let writer = std::thread::spawn(move || {
            left.write_all(b"@(#) International Ispell ").unwrap();
            left.write_all(b"Version 3.1.20 10/10/95\n").unwrap();
        });

        let mut line = LineBuffer::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(
            line.as_bytes(),
            b"@(#) International Ispell Version 3.1.20 10/10/95\n"
        );
        writer.join().unwrap();
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = LineReader::new(Cursor::new(Vec::<u8>::new()));
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }
}
