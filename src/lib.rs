//! # gesture-gatherer
//!
//! Gathers multi-touch gesture events from libinput and forwards the start
//! of every gesture to a controller.
//!
//! ## Features
//!
//! - Privileged device access through an injectable open/close shim, with an
//!   actionable error when the user lacks permission
//! - Ordered, leak-free setup and teardown of the udev and libinput handles
//! - No busy polling: the thread sleeps in `poll(2)` until input arrives,
//!   then drains every queued event
//! - Controllers as traits, closures, or channel senders
//!
//! ## Quick Start
//!
//! ```no_run
//! use gesture_gatherer::{Config, Gesture, gather};
//!
//! gather(Config::default(), |gesture: Gesture| {
//!     println!("{:?} started with {} fingers", gesture.gesture_type, gesture.fingers);
//! })
//! .expect("Failed to gather gestures");
//! ```
//!
//! ## Architecture
//!
//! [`GestureGatherer`] owns an [`InputContext`] and runs on the calling
//! thread. It alternates between blocking in a [`ReadinessWaiter`] and
//! draining the input library's queue, until the wait fails. The OS side
//! is behind the [`InputBackend`] trait; the libinput implementation is
//! enabled with the `libinput` feature.

pub mod access;
pub mod channel;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod gatherer;
pub mod gesture;
pub mod wait;

mod platform;

#[cfg(test)]
mod testing;

// Re-exports
pub use access::{DeviceAccess, SystemDeviceAccess};
pub use config::Config;
pub use context::{InputBackend, InputContext, InputLibrary, RawEvent};
pub use controller::GestureController;
pub use error::{Error, InitStage, Result};
pub use gatherer::{DrainReport, GathererState, GestureGatherer, Stopped};
pub use gesture::{EventKind, Gesture, GestureType};
pub use wait::{PollWaiter, ReadinessWaiter};

pub use platform::gather;
#[cfg(all(target_os = "linux", feature = "libinput"))]
pub use platform::{LibinputBackend, LibinputContext, LibinputEvent};
