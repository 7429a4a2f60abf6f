use std::io::{Read, Write};
use std::os::fd::AsFd;
use std::time::Duration;

use gspell_frame::{plain_string, LineBuffer, LineReader};
use gspell_transport::poll_readable;
use tracing::debug;

use crate::error::{Result, SessionError, WorkerChannel};

/// Diagnostic the worker prints when a dictionary or other resource is
/// missing. Always fatal.
pub const CANNOT_OPEN_PREFIX: &[u8] = b"Can't open ";

/// Non-blocking relay of the worker's diagnostic channel.
pub struct ErrorDrain<E> {
    reader: LineReader<E>,
    line: LineBuffer,
}

impl<E: Read + AsFd> ErrorDrain<E> {
    /// Create a drain over the worker's diagnostic channel.
    pub fn new(channel: E) -> Self {
        Self {
            reader: LineReader::new(channel),
            line: LineBuffer::new(),
        }
    }

    /// True when a line (or end of channel) can be read without waiting.
    pub fn is_ready(&self) -> Result<bool> {
        if self.reader.has_buffered_line() {
            return Ok(true);
        }
        Ok(poll_readable(self.reader.get_ref().as_fd(), Duration::ZERO)?)
    }

    /// Relay every diagnostic line that is available right now.
    ///
    /// Each line is written to `relay` as `<worker_name>: <line>`. A
    /// `Can't open <resource>` line ends the session, and so does the
    /// channel closing: the worker only closes it while shutting down.
    /// Returns the number of lines relayed.
    pub fn drain(&mut self, worker_name: &str, relay: &mut dyn Write) -> Result<usize> {
        let mut relayed = 0usize;

        while self.is_ready()? {
            self.line.reset();
            self.reader
                .read_line(&mut self.line)
                .map_err(|err| SessionError::from_read(WorkerChannel::Diagnostics, err))?;

            let text = self.line.trimmed();
            if let Some(resource) = text.strip_prefix(CANNOT_OPEN_PREFIX) {
                let resource = plain_string(resource);
                debug!(%resource, "worker cannot open resource");
                return Err(SessionError::CannotOpen { resource });
            }

            let text = plain_string(text);
            debug!(line = %text, "relaying worker diagnostic");
            writeln!(relay, "{worker_name}: {text}").map_err(SessionError::Output)?;
            relayed += 1;
        }

        Ok(relayed)
    }

    /// Borrow the underlying line reader.
    pub fn reader(&self) -> &LineReader<E> {
        &self.reader
    }

    /// Consume the drain and return its line reader.
    pub fn into_reader(self) -> LineReader<E> {
        self.reader
    }
}

impl<E> std::fmt::Debug for ErrorDrain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorDrain")
            .field("reader", &self.reader)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::net::UnixStream;

    use super::*;

    fn drain_pair() -> (UnixStream, ErrorDrain<UnixStream>) {
        let (worker, controller) = UnixStream::pair().unwrap();
        (worker, ErrorDrain::new(controller))
    }

    #[test]
    fn nothing_pending_returns_immediately() {
        let (_worker, mut drain) = drain_pair();
        let mut relay = Vec::new();
        assert_eq!(drain.drain("ispell", &mut relay).unwrap(), 0);
        assert!(relay.is_empty());
    }

    #[test]
    fn relays_lines_with_worker_prefix() {
        let (mut worker, mut drain) = drain_pair();
        worker
            .write_all(b"warning: odd affix\r\nsecond note\n")
            .unwrap();

        let mut relay = Vec::new();
        assert_eq!(drain.drain("/usr/bin/ispell", &mut relay).unwrap(), 2);
        assert_eq!(
            String::from_utf8(relay).unwrap(),
            "/usr/bin/ispell: warning: odd affix\n/usr/bin/ispell: second note\n"
        );
    }

    #[test]
    fn cannot_open_is_fatal_and_names_resource() {
        let (mut worker, mut drain) = drain_pair();
        worker.write_all(b"Can't open /no/such/dict\n").unwrap();

        let mut relay = Vec::new();
        let err = drain.drain("ispell", &mut relay).unwrap_err();
        assert!(
            matches!(&err, SessionError::CannotOpen { resource } if resource == "/no/such/dict")
        );
        assert!(err.to_string().contains("/no/such/dict"));
        assert!(relay.is_empty());
    }

    #[test]
    fn similar_but_different_prefix_is_relayed() {
        let (mut worker, mut drain) = drain_pair();
        worker.write_all(b"Can't openly say\n").unwrap();
        worker.write_all(b"can't open lowercase\n").unwrap();

        let mut relay = Vec::new();
        assert_eq!(drain.drain("ispell", &mut relay).unwrap(), 2);
    }

    #[test]
    fn closed_channel_is_premature_end() {
        let (worker, mut drain) = drain_pair();
        drop(worker);

        let mut relay = Vec::new();
        let err = drain.drain("ispell", &mut relay).unwrap_err();
        assert!(matches!(
            err,
            SessionError::PrematureEnd {
                channel: WorkerChannel::Diagnostics
            }
        ));
    }

    #[test]
    fn pending_lines_are_relayed_before_close_is_reported() {
        let (mut worker, mut drain) = drain_pair();
        worker.write_all(b"last words\n").unwrap();
        drop(worker);

        let mut relay = Vec::new();
        let err = drain.drain("ispell", &mut relay).unwrap_err();
        assert!(matches!(err, SessionError::PrematureEnd { .. }));
        assert_eq!(String::from_utf8(relay).unwrap(), "ispell: last words\n");
    }

    #[test]
    fn drain_is_repeatable() {
        let (mut worker, mut drain) = drain_pair();
        let mut relay = Vec::new();

        worker.write_all(b"one\n").unwrap();
        assert_eq!(drain.drain("ispell", &mut relay).unwrap(), 1);
        assert_eq!(drain.drain("ispell", &mut relay).unwrap(), 0);
        worker.write_all(b"two\n").unwrap();
        assert_eq!(drain.drain("ispell", &mut relay).unwrap(), 1);
        assert!(!drain.reader().has_buffered_line());
    }
}
