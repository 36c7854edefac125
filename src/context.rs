//! Ownership of the udev and libinput handles.
//!
//! The OS side is abstracted behind [`InputBackend`] so the acquisition order
//! and the drain loop do not depend on a linked libinput. The real backend
//! lives in the platform module; tests use a scripted one.

use crate::access::DeviceAccess;
use crate::error::{Error, InitStage, Result};
use crate::gesture::EventKind;
use std::io;
use std::os::fd::RawFd;

/// A low-level event owned by the input library.
///
/// Payload accessors return neutral values for events that do not carry the
/// field.
pub trait RawEvent {
    /// The event discriminant.
    fn kind(&self) -> EventKind;

    /// Number of fingers involved in a gesture event.
    fn finger_count(&self) -> u32;

    /// Kernel name of the device that produced the event.
    fn device_sysname(&self) -> Option<String>;

    /// Timestamp in microseconds.
    fn time_usec(&self) -> u64;
}

/// An initialised input-library context.
pub trait InputLibrary {
    /// The event type yielded by [`next_event`](Self::next_event).
    type Event: RawEvent;

    /// Attach the context to a seat, which opens that seat's devices.
    fn assign_seat(&mut self, seat: &str) -> io::Result<()>;

    /// The descriptor to poll for new input, or `None` if there is none.
    fn pollable_fd(&self) -> Option<RawFd>;

    /// Read pending data from the kernel into the internal event queue.
    fn dispatch(&mut self) -> io::Result<()>;

    /// Pop the next queued event.
    fn next_event(&mut self) -> Option<Self::Event>;

    /// The first device access failure seen since the last call.
    fn take_access_error(&mut self) -> Option<Error> {
        None
    }
}

/// Creates the OS handles an [`InputContext`] owns.
pub trait InputBackend {
    /// The udev-like device manager handle.
    type DeviceManager;
    /// The libinput-like context.
    type Library: InputLibrary;

    /// Create the device manager. `None` means creation failed.
    fn create_device_manager(&mut self) -> Option<Self::DeviceManager>;

    /// Create the input library on top of `device_manager`. Every device it
    /// opens must go through `access`. `None` means creation failed.
    fn create_library(
        &mut self,
        device_manager: &Self::DeviceManager,
        access: Box<dyn DeviceAccess>,
    ) -> Option<Self::Library>;
}

/// Owns the device manager and the input library bound to a seat.
///
/// Handles are released in reverse order of acquisition: the library first,
/// then the device manager.
pub struct InputContext<B: InputBackend> {
    device_manager: Option<B::DeviceManager>,
    library: Option<B::Library>,
}

impl<B: InputBackend> InputContext<B> {
    /// Create both handles and bind to `seat`.
    ///
    /// On failure everything acquired so far is released before the error is
    /// returned.
    pub fn new(backend: &mut B, seat: &str, access: Box<dyn DeviceAccess>) -> Result<Self> {
        let mut context = Self {
            device_manager: None,
            library: None,
        };

        let device_manager = backend
            .create_device_manager()
            .ok_or(Error::Initialization(InitStage::DeviceManager))?;
        let device_manager = context.device_manager.insert(device_manager);
        log::debug!("device manager created");

        let library = backend
            .create_library(device_manager, access)
            .ok_or(Error::Initialization(InitStage::InputLibrary))?;
        let library = context.library.insert(library);
        log::debug!("input library context created");

        if seat.contains('\0') {
            log::error!("seat name {:?} contains a NUL byte", seat);
            return Err(Error::Initialization(InitStage::SeatBind));
        }
        if let Err(e) = library.assign_seat(seat) {
            log::error!("failed to assign seat {}: {}", seat, e);
            return Err(Error::Initialization(InitStage::SeatBind));
        }
        if let Some(err) = library.take_access_error() {
            return Err(err);
        }
        log::info!("input context bound to {}", seat);

        Ok(context)
    }

    /// The descriptor that becomes readable when new input is pending.
    pub fn pollable_descriptor(&self) -> Result<RawFd> {
        self.library
            .as_ref()
            .and_then(|library| library.pollable_fd())
            .filter(|fd| *fd >= 0)
            .ok_or(Error::Initialization(InitStage::DescriptorFetch))
    }

    /// Prime the event queue. Returns a device access failure that surfaced
    /// while reading, if any.
    pub fn dispatch(&mut self) -> Result<()> {
        let Some(library) = self.library.as_mut() else {
            return Ok(());
        };
        if let Err(e) = library.dispatch() {
            log::warn!("input dispatch failed: {}", e);
        }
        match library.take_access_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Pop the next queued event.
    pub fn next_event(&mut self) -> Option<<B::Library as InputLibrary>::Event> {
        self.library.as_mut()?.next_event()
    }

    /// Release both handles. Safe to call more than once.
    pub fn release(&mut self) {
        if self.library.take().is_some() {
            log::debug!("input library context released");
        }
        if self.device_manager.take().is_some() {
            log::debug!("device manager released");
        }
    }
}

impl<B: InputBackend> Drop for InputContext<B> {
    fn drop(&mut self) {
        self.release();
    }
}
