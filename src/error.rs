//! Error types for the gesture gatherer.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gesture-gatherer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Remediation printed whenever a device node cannot be opened.
pub const DEVICE_ACCESS_HINT: &str = "Please execute the following command:\n\
     $ sudo usermod -a -G input $USER\n\
     And reboot to solve this issue";

/// The construction step that failed while setting up the input context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStage {
    /// Creating the udev device-manager handle.
    DeviceManager,
    /// Creating the libinput context.
    InputLibrary,
    /// Assigning the libinput context to a seat.
    SeatBind,
    /// Fetching the pollable descriptor of the libinput context.
    DescriptorFetch,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::DeviceManager => "udev",
            InitStage::InputLibrary => "libinput",
            InitStage::SeatBind => "libinput seat",
            InitStage::DescriptorFetch => "libinput_get_fd",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while gathering gestures.
#[derive(Debug, Error)]
pub enum Error {
    /// The input context could not be set up.
    #[error("error initialising gesture gatherer: {0}")]
    Initialization(InitStage),

    /// A device node could not be opened.
    #[error(
        "cannot open {}: {source}.\n{hint}",
        .path.display(),
        hint = DEVICE_ACCESS_HINT
    )]
    DeviceAccess {
        /// The device node that failed to open.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The requested backend is not available in this build.
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// The initialization stage that failed, if this is an initialization error.
    pub fn stage(&self) -> Option<InitStage> {
        match self {
            Error::Initialization(stage) => Some(*stage),
            _ => None,
        }
    }

    /// The raw OS error code behind a device access failure.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::DeviceAccess { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}
