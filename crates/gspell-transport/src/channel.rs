use std::fs::File;
use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

use tracing::{debug, trace};

use crate::error::{Result, TransportError};

/// The three pipes connecting the controller to a worker process.
///
/// Each pipe has one end used by the controller and one end handed to the
/// worker when it is spawned. Every descriptor is created close-on-exec so
/// nothing leaks into unrelated children; the worker's standard streams are
/// installed with `dup2`, which clears the flag on the copies.
#[derive(Debug)]
pub struct ChannelSet {
    controller: ControllerEnds,
    worker: WorkerEnds,
}

/// Controller-side endpoints: owned and used exclusively by the controller.
#[derive(Debug)]
pub struct ControllerEnds {
    /// Write end of the worker's standard input.
    pub input: File,
    /// Read end of the worker's standard output.
    pub output: File,
    /// Read end of the worker's standard error.
    pub errors: File,
}

/// Worker-side endpoints: handed to the worker at spawn, then closed by the
/// controller.
#[derive(Debug)]
pub struct WorkerEnds {
    /// Becomes the worker's standard input.
    pub input: OwnedFd,
    /// Becomes the worker's standard output.
    pub output: OwnedFd,
    /// Becomes the worker's standard error.
    pub errors: OwnedFd,
}

impl ChannelSet {
    /// Create the three independent unidirectional channels.
    pub fn establish() -> Result<Self> {
        let (worker_in, controller_in) = pipe_pair().map_err(TransportError::Pipe)?;
        let (controller_out, worker_out) = pipe_pair().map_err(TransportError::Pipe)?;
        let (controller_err, worker_err) = pipe_pair().map_err(TransportError::Pipe)?;

        debug!(
            controller_in = controller_in.as_raw_fd(),
            controller_out = controller_out.as_raw_fd(),
            controller_err = controller_err.as_raw_fd(),
            "established worker channels"
        );

        Ok(Self {
            controller: ControllerEnds {
                input: File::from(controller_in),
                output: File::from(controller_out),
                errors: File::from(controller_err),
            },
            worker: WorkerEnds {
                input: worker_in,
                output: worker_out,
                errors: worker_err,
            },
        })
    }

    /// Controller-side endpoints.
    pub fn controller(&self) -> &ControllerEnds {
        &self.controller
    }

    /// Worker-side endpoints.
    pub fn worker(&self) -> &WorkerEnds {
        &self.worker
    }

    /// Split into controller-side and worker-side endpoints.
    pub fn split(self) -> (ControllerEnds, WorkerEnds) {
        (self.controller, self.worker)
    }
}

impl WorkerEnds {
    /// Close all three worker-side endpoints in this process.
    ///
    /// Must run right after the worker is spawned: while a copy of the write
    /// end of its input stays open here, the worker never sees end of input.
    pub fn close(self) {
        trace!(
            input = self.input.as_raw_fd(),
            output = self.output.as_raw_fd(),
            errors = self.errors.as_raw_fd(),
            "closing worker-side endpoints"
        );
        drop(self.input);
        drop(self.output);
        drop(self.errors);
    }
}

impl ControllerEnds {
    /// Borrow the diagnostic channel's descriptor for readiness polling.
    pub fn errors_fd(&self) -> BorrowedFd<'_> {
        self.errors.as_fd()
    }
}

/// Create one pipe, returning `(read_end, write_end)` with both ends
/// marked close-on-exec.
fn pipe_pair() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds: [RawFd; 2] = [-1; 2];

    // SAFETY: `fds` is a valid, writable array of two descriptors as
    // required by pipe(2).
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) };
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: pipe(2) succeeded, so both descriptors are open and owned by
    // nobody else in this process.
    let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    {
        set_cloexec(read.as_raw_fd())?;
        set_cloexec(write.as_raw_fd())?;
    }

    Ok((read, write))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn set_cloexec(fd: RawFd) -> io::Result<()> {
    // SAFETY: `fd` is an open descriptor owned by the caller; F_GETFD/F_SETFD
    // only touch its descriptor flags.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
