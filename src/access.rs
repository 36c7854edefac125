//! Privileged open/close of input device nodes.
//!
//! libinput does not open `/dev/input/event*` itself; it asks the embedding
//! program through a pair of callbacks. [`DeviceAccess`] is that capability,
//! handed to the input context when it is created.
//!
//! ## Permissions
//!
//! Opening device nodes requires read access, usually granted through the
//! `input` group:
//! ```bash
//! sudo usermod -a -G input $USER
//! # Then reboot
//! ```

use crate::error::{Error, Result};
use std::ffi::CString;
use std::io;
use std::os::fd::{FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Opens and closes device nodes on behalf of the input library.
pub trait DeviceAccess {
    /// Open `path` with the raw `open(2)` flags requested by the input library.
    fn open_device(&mut self, path: &Path, flags: i32) -> Result<OwnedFd>;

    /// Release a descriptor returned by [`open_device`](Self::open_device).
    fn close_device(&mut self, fd: OwnedFd);
}

/// Opens device nodes directly with the process' own credentials.
///
/// Failures are never retried: a permission problem does not go away
/// without a new login session.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDeviceAccess;

impl SystemDeviceAccess {
    /// Create a new shim.
    pub fn new() -> Self {
        Self
    }
}

impl DeviceAccess for SystemDeviceAccess {
    fn open_device(&mut self, path: &Path, flags: i32) -> Result<OwnedFd> {
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::DeviceAccess {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::InvalidInput),
        })?;

        // SAFETY: `c_path` is a valid NUL-terminated string for the call.
        let fd = unsafe { libc::open(c_path.as_ptr(), flags) };
        if fd < 0 {
            let source = io::Error::last_os_error();
            log::error!("failed to open {}: {}", path.display(), source);
            return Err(Error::DeviceAccess {
                path: path.to_path_buf(),
                source,
            });
        }

        log::debug!("opened {} as fd {}", path.display(), fd);
        // SAFETY: `open` returned a fresh descriptor that nothing else owns.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }

    fn close_device(&mut self, fd: OwnedFd) {
        // Dropping closes; close(2) errors are ignored.
        drop(fd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn test_open_and_close() {
        let mut access = SystemDeviceAccess::new();
        let fd = access
            .open_device(Path::new("/dev/null"), libc::O_RDONLY | libc::O_CLOEXEC)
            .unwrap();
        assert!(fd.as_raw_fd() >= 0);
        access.close_device(fd);
    }

    #[test]
    fn test_open_failure_carries_remediation() {
        let mut access = SystemDeviceAccess::new();
        let path = Path::new("/dev/input/does-not-exist-gesture-gatherer");
        let err = access.open_device(path, libc::O_RDWR).unwrap_err();

        match &err {
            Error::DeviceAccess { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
        assert!(err.to_string().contains("sudo usermod -a -G input $USER"));
    }

    #[test]
    fn test_path_with_nul_is_rejected() {
        let mut access = SystemDeviceAccess::new();
        let path = Path::new(std::ffi::OsStr::from_bytes(b"/dev/in\0put"));
        let err = access.open_device(path, libc::O_RDONLY).unwrap_err();
        assert!(matches!(err, Error::DeviceAccess { .. }));
    }
}
