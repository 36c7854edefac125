//! Channel-backed controllers.
//!
//! The gatherer runs on the thread that calls it, so the simplest way to
//! consume gestures elsewhere is to hand it the sending half of a channel.
//!
//! # Example
//!
//! ```no_run
//! use gesture_gatherer::{Config, Gesture, gather};
//! use std::sync::mpsc;
//! use std::thread;
//!
//! let (tx, rx) = mpsc::channel::<Gesture>();
//!
//! thread::spawn(move || {
//!     for gesture in rx {
//!         println!("{:?} with {} fingers", gesture.gesture_type, gesture.fingers);
//!     }
//! });
//!
//! gather(Config::default(), tx).expect("Failed to gather gestures");
//! ```
//!
//! A receiver that has gone away is not an error for the gatherer: the
//! gesture is dropped and the loop keeps running.

use crate::controller::GestureController;
use crate::gesture::Gesture;
use std::sync::mpsc::{Sender, SyncSender};

impl GestureController for Sender<Gesture> {
    fn on_gesture_begin(&mut self, gesture: Gesture) {
        if self.send(gesture).is_err() {
            log::debug!("gesture receiver disconnected, dropping gesture");
        }
    }
}

/// Blocks when the channel is full.
impl GestureController for SyncSender<Gesture> {
    fn on_gesture_begin(&mut self, gesture: Gesture) {
        if self.send(gesture).is_err() {
            log::debug!("gesture receiver disconnected, dropping gesture");
        }
    }
}

#[cfg(feature = "tokio")]
impl GestureController for tokio::sync::mpsc::UnboundedSender<Gesture> {
    fn on_gesture_begin(&mut self, gesture: Gesture) {
        if self.send(gesture).is_err() {
            log::debug!("gesture receiver disconnected, dropping gesture");
        }
    }
}
