//! Gatherer configuration.
//!
//! The gatherer only reads the seat name; the rest of the configuration is
//! carried through untouched for the controller side.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The seat libinput is bound to when none is configured.
pub const DEFAULT_SEAT: &str = "seat0";

/// Configuration handed to the gatherer at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Name of the udev seat whose devices are monitored.
    pub seat: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seat: DEFAULT_SEAT.to_string(),
        }
    }
}

impl Config {
    /// Create a configuration bound to the default seat.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a different seat.
    pub fn with_seat(mut self, seat: impl Into<String>) -> Self {
        self.seat = seat.into();
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
