use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::time::Duration;

use crate::error::{Result, TransportError};

/// Check whether `fd` can be read without blocking.
///
/// With a zero `timeout` this never waits. Hang-up and error conditions
/// count as readable, so a closed channel is reported here and observed as
/// end of stream by the following read.
pub fn poll_readable(fd: BorrowedFd<'_>, timeout: Duration) -> Result<bool> {
    let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    let mut pfd = libc::pollfd {
        fd: fd.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };

    loop {
        // SAFETY: `pfd` is a single valid pollfd for the duration of the call
        // and `fd` is borrowed, so it stays open.
        let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(TransportError::Poll(err));
        }
        if rc == 0 {
            return Ok(false);
        }
        return Ok(pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0);
    }
}
