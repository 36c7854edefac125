//! Platform-specific backends.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::*;

#[cfg(not(target_os = "linux"))]
mod stub {
    use crate::config::Config;
    use crate::controller::GestureController;
    use crate::error::{Error, Result};
    use crate::gatherer::Stopped;

    pub fn gather<C: GestureController>(_config: Config, _controller: C) -> Result<Stopped> {
        Err(Error::NotSupported(
            "gesture gathering requires Linux with libinput".into(),
        ))
    }
}

#[cfg(not(target_os = "linux"))]
pub use stub::*;
