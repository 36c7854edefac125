//! The gesture gatherer: wait for input, drain it, forward gesture begins.
//!
//! The gatherer alternates between two states on the calling thread:
//!
//! - **Idle**: blocked in the readiness waiter until the input descriptor
//!   has data.
//! - **Draining**: the input library has been dispatched and queued events
//!   are pulled one by one until none remain.
//!
//! It reaches **Stopped** only when the wait itself fails, or when a device
//! could not be opened.

use crate::access::{DeviceAccess, SystemDeviceAccess};
use crate::config::Config;
use crate::context::{InputBackend, InputContext, InputLibrary, RawEvent};
use crate::controller::GestureController;
use crate::error::Result;
use crate::gesture::{EventKind, Gesture};
use crate::wait::{PollWaiter, ReadinessWaiter};
use std::io;

/// Where the gatherer is in its wait/drain cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GathererState {
    /// Waiting for device data.
    Idle,
    /// Processing a non-empty event queue.
    Draining,
    /// The main loop has ended.
    Stopped,
}

/// Counts from a single drain cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Events pulled from the queue.
    pub received: usize,
    /// Gestures handed to the controller.
    pub dispatched: usize,
    /// Events dropped without a controller call.
    pub ignored: usize,
}

/// Why and when the main loop ended.
#[derive(Debug)]
pub struct Stopped {
    /// The error reported by the readiness wait.
    pub cause: io::Error,
    /// Drain cycles completed before the wait failed.
    pub cycles: u64,
}

/// Gathers gestures from an input context and forwards them to a controller.
pub struct GestureGatherer<B: InputBackend, C: GestureController> {
    config: Config,
    controller: C,
    context: InputContext<B>,
    state: GathererState,
}

impl<B: InputBackend, C: GestureController> GestureGatherer<B, C> {
    /// Set up the input context on `backend`, opening devices with the
    /// process' own permissions.
    pub fn new(config: Config, controller: C, backend: &mut B) -> Result<Self> {
        Self::with_access(config, controller, backend, Box::new(SystemDeviceAccess::new()))
    }

    /// Set up the input context with a custom device access shim.
    pub fn with_access(
        config: Config,
        controller: C,
        backend: &mut B,
        access: Box<dyn DeviceAccess>,
    ) -> Result<Self> {
        let context = InputContext::new(backend, &config.seat, access)?;
        Ok(Self {
            config,
            controller,
            context,
            state: GathererState::Idle,
        })
    }

    /// The configuration this gatherer was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The controller gestures are delivered to.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// The current state.
    pub fn state(&self) -> GathererState {
        self.state
    }

    /// The owned input context.
    pub fn context_mut(&mut self) -> &mut InputContext<B> {
        &mut self.context
    }

    /// Run the main loop with a `poll(2)` waiter (blocking).
    ///
    /// Returns `Ok` once the wait fails; whether that is fatal is up to the
    /// caller. Returns `Err` if the descriptor cannot be fetched or a device
    /// cannot be opened.
    pub fn run(&mut self) -> Result<Stopped> {
        self.run_with(&mut PollWaiter::new())
    }

    /// Run the main loop with the given waiter (blocking).
    pub fn run_with<W: ReadinessWaiter>(&mut self, waiter: &mut W) -> Result<Stopped> {
        let fd = match self.context.pollable_descriptor() {
            Ok(fd) => fd,
            Err(e) => {
                self.state = GathererState::Stopped;
                return Err(e);
            }
        };
        log::info!("gathering gestures from fd {}", fd);

        let mut cycles = 0u64;
        loop {
            self.state = GathererState::Idle;
            if let Err(cause) = waiter.wait_for_data(fd) {
                log::warn!("waiting for input failed, stopping: {}", cause);
                self.state = GathererState::Stopped;
                return Ok(Stopped { cause, cycles });
            }

            let report = self.drain_and_dispatch()?;
            cycles += 1;
            log::trace!(
                "drain cycle {}: {} events, {} dispatched",
                cycles,
                report.received,
                report.dispatched
            );
        }
    }

    /// Dispatch the input library and process every queued event.
    ///
    /// When this returns `Ok` the event queue is empty.
    pub fn drain_and_dispatch(&mut self) -> Result<DrainReport> {
        self.state = GathererState::Draining;

        if let Err(e) = self.context.dispatch() {
            self.state = GathererState::Stopped;
            return Err(e);
        }

        let mut report = DrainReport::default();
        while let Some(event) = self.context.next_event() {
            report.received += 1;
            if self.handle_event(event) {
                report.dispatched += 1;
            } else {
                report.ignored += 1;
            }
        }

        self.state = GathererState::Idle;
        Ok(report)
    }

    /// Route one event. Returns `true` if the controller was called.
    fn handle_event(&mut self, event: <B::Library as InputLibrary>::Event) -> bool {
        match event.kind() {
            EventKind::SwipeBegin => {
                let Some(gesture) = Gesture::from_event(&event) else {
                    return false;
                };
                drop(event);
                log::debug!(
                    "{:?} begin with {} fingers",
                    gesture.gesture_type,
                    gesture.fingers
                );
                self.controller.on_gesture_begin(gesture);
                true
            }
            // TODO: forward swipe update/end and the pinch family once the
            // controller has matching callbacks.
            kind => {
                log::trace!("ignoring {:?} event", kind);
                false
            }
        }
    }
}
