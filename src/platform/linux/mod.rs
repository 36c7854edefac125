//! Linux platform implementation.
//!
//! Gestures are read through libinput, with devices discovered by udev.
//!
//! ## Feature Flags
//!
//! - `libinput`: link against libinput and libudev. Without it every entry
//!   point returns [`Error::NotSupported`](crate::Error::NotSupported).
//!
//! ## Permissions
//!
//! libinput needs read access to `/dev/input/event*`:
//! ```bash
//! sudo usermod -a -G input $USER
//! # Then reboot
//! ```

#[cfg(feature = "libinput")]
mod libinput;

#[cfg(feature = "libinput")]
pub use libinput::*;

#[cfg(not(feature = "libinput"))]
mod stub {
    use crate::config::Config;
    use crate::controller::GestureController;
    use crate::error::{Error, Result};
    use crate::gatherer::Stopped;

    pub fn gather<C: GestureController>(_config: Config, _controller: C) -> Result<Stopped> {
        Err(Error::NotSupported(
            "No Linux backend enabled. Enable the 'libinput' feature.".into(),
        ))
    }
}

#[cfg(not(feature = "libinput"))]
pub use stub::*;
