//! Blocking wait for input readiness.

use std::io;
use std::os::fd::RawFd;

/// Suspends the caller until a descriptor has data to read.
pub trait ReadinessWaiter {
    /// Block until `fd` is readable. An error ends the gatherer's main loop.
    fn wait_for_data(&mut self, fd: RawFd) -> io::Result<()>;
}

/// Waits with `poll(2)` and no timeout.
///
/// Interrupted waits are retried. A descriptor that reports an error, is
/// invalid, or has hung up with nothing left to read is a failure, since
/// polling it again would return immediately forever.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollWaiter;

impl PollWaiter {
    /// Create a new waiter.
    pub fn new() -> Self {
        Self
    }
}

impl ReadinessWaiter for PollWaiter {
    fn wait_for_data(&mut self, fd: RawFd) -> io::Result<()> {
        // poll(2) silently ignores negative descriptors, which would block forever.
        if fd < 0 {
            return Err(io::Error::from_raw_os_error(libc::EBADF));
        }

        let mut poll_fds = [libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        }];

        loop {
            // SAFETY: `poll_fds` is a live array of `poll_fds.len()` entries.
            let ret = unsafe { libc::poll(poll_fds.as_mut_ptr(), poll_fds.len() as _, -1) };

            if ret < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }

            let revents = poll_fds[0].revents;
            if revents & libc::POLLNVAL != 0 {
                return Err(io::Error::from_raw_os_error(libc::EBADF));
            }
            if revents & libc::POLLERR != 0 {
                return Err(io::Error::other("error condition on input descriptor"));
            }
            if revents & libc::POLLIN != 0 {
                return Ok(());
            }
            if revents & libc::POLLHUP != 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
        }
    }
}
