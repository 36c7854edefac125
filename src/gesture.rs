//! Low-level event classification and the gesture values handed to controllers.

use crate::context::RawEvent;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discriminant of a low-level input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A multi-finger swipe started.
    SwipeBegin,
    /// A swipe in progress moved.
    SwipeUpdate,
    /// A swipe finished or was cancelled.
    SwipeEnd,
    /// A pinch/rotate gesture started.
    PinchBegin,
    /// A pinch in progress changed.
    PinchUpdate,
    /// A pinch finished or was cancelled.
    PinchEnd,
    /// Anything else (device added/removed, pointer, keyboard, touch...).
    Other,
}

/// The family a gesture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GestureType {
    /// Fingers moving together in one direction.
    Swipe,
    /// Fingers moving towards or away from each other.
    Pinch,
}

/// A gesture-begin occurrence, detached from the event it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gesture {
    /// Which kind of gesture started.
    pub gesture_type: GestureType,
    /// Number of fingers on the touchpad.
    pub fingers: u32,
    /// Kernel name of the originating device (e.g. `event7`), if known.
    pub device: Option<String>,
    /// Event timestamp in microseconds, monotonic clock.
    pub time_usec: u64,
}

impl Gesture {
    /// Translate a low-level gesture-begin event.
    ///
    /// Returns `None` for any event that does not start a gesture. Everything
    /// the gesture needs is copied out, so the event can be released as soon
    /// as this returns.
    pub fn from_event<E: RawEvent>(event: &E) -> Option<Self> {
        let gesture_type = match event.kind() {
            EventKind::SwipeBegin => GestureType::Swipe,
            EventKind::PinchBegin => GestureType::Pinch,
            _ => return None,
        };

        Some(Self {
            gesture_type,
            fingers: event.finger_count(),
            device: event.device_sysname(),
            time_usec: event.time_usec(),
        })
    }
}
