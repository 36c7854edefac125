//! libinput backend, seat devices discovered through udev.

use crate::access::DeviceAccess;
use crate::config::Config;
use crate::context::{InputBackend, InputLibrary, RawEvent};
use crate::controller::GestureController;
use crate::error::{Error, Result};
use crate::gatherer::{GestureGatherer, Stopped};
use crate::gesture::EventKind;
use input::event::gesture::{
    GestureEventCoreTrait, GestureEventTrait, GesturePinchEvent, GestureSwipeEvent,
};
use input::event::{EventTrait, GestureEvent};
use input::{Event, Libinput, ffi};
use std::cell::RefCell;
use std::ffi::{CStr, OsStr, c_char, c_int, c_void};
use std::io;
use std::mem::ManuallyDrop;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::rc::Rc;
use udev::AsRaw;

/// First device access failure, shared between the open callback and the context.
type DeniedSlot = Rc<RefCell<Option<Error>>>;

/// Routes libinput's open/close callbacks through a [`DeviceAccess`] shim.
///
/// libinput only understands an errno, so the full error is parked in the
/// shared slot for the gatherer to pick up after the call returns.
struct RestrictedInterface {
    access: Box<dyn DeviceAccess>,
    denied: DeniedSlot,
}

impl RestrictedInterface {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> std::result::Result<OwnedFd, i32> {
        match self.access.open_device(path, flags) {
            Ok(fd) => Ok(fd),
            Err(err) => {
                let errno = err.raw_os_error().unwrap_or(libc::EACCES);
                log::error!("{}", err);
                let mut denied = self.denied.borrow_mut();
                if denied.is_none() {
                    *denied = Some(err);
                }
                Err(errno)
            }
        }
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        self.access.close_device(fd);
    }
}

/// `open_restricted` entry point handed to libinput. Returns a negative errno on failure.
unsafe extern "C" fn open_restricted(
    path: *const c_char,
    flags: c_int,
    user_data: *mut c_void,
) -> c_int {
    // SAFETY: `user_data` is the `RestrictedInterface` owned by the
    // `LibinputContext`, which outlives the libinput context.
    let Some(interface) = (unsafe { user_data.cast::<RestrictedInterface>().as_mut() }) else {
        return -libc::EINVAL;
    };
    if path.is_null() {
        return -libc::EINVAL;
    }
    // SAFETY: libinput passes a valid NUL-terminated path.
    let path = Path::new(OsStr::from_bytes(unsafe { CStr::from_ptr(path) }.to_bytes()));
    match interface.open_restricted(path, flags) {
        Ok(fd) => fd.into_raw_fd(),
        Err(errno) => -errno.abs(),
    }
}

/// `close_restricted` entry point handed to libinput.
unsafe extern "C" fn close_restricted(fd: c_int, user_data: *mut c_void) {
    // SAFETY: see `open_restricted`.
    let Some(interface) = (unsafe { user_data.cast::<RestrictedInterface>().as_mut() }) else {
        return;
    };
    if fd >= 0 {
        // SAFETY: libinput hands back a descriptor obtained from `open_restricted`.
        interface.close_restricted(unsafe { OwnedFd::from_raw_fd(fd) });
    }
}

static CALLBACKS: ffi::libinput_interface = ffi::libinput_interface {
    open_restricted: Some(open_restricted),
    close_restricted: Some(close_restricted),
};

/// Creates udev and libinput handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibinputBackend;

impl LibinputBackend {
    /// Create a new backend.
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for LibinputBackend {
    type DeviceManager = udev::Udev;
    type Library = LibinputContext;

    fn create_device_manager(&mut self) -> Option<udev::Udev> {
        match udev::Udev::new() {
            Ok(udev) => Some(udev),
            Err(e) => {
                log::error!("udev_new failed: {}", e);
                None
            }
        }
    }

    fn create_library(
        &mut self,
        device_manager: &udev::Udev,
        access: Box<dyn DeviceAccess>,
    ) -> Option<LibinputContext> {
        let denied = DeniedSlot::default();
        let interface = Box::into_raw(Box::new(RestrictedInterface {
            access,
            denied: denied.clone(),
        }));

        // SAFETY: the callback table is static, `interface` stays alive until
        // the context is dropped, and the udev handle is valid for the call
        // (libinput takes its own reference).
        let raw = unsafe {
            ffi::libinput_udev_create_context(
                &CALLBACKS,
                interface.cast(),
                device_manager.as_raw().cast::<ffi::udev>(),
            )
        };
        if raw.is_null() {
            log::error!("libinput_udev_create_context failed");
            // SAFETY: libinput kept no reference to a context it never created.
            drop(unsafe { Box::from_raw(interface) });
            return None;
        }

        // SAFETY: `raw` is a live context. `from_raw` takes its own reference,
        // so the creation reference is handed over by releasing it.
        let libinput = unsafe {
            let libinput = Libinput::from_raw(raw);
            ffi::libinput_unref(raw);
            libinput
        };

        Some(LibinputContext {
            libinput: ManuallyDrop::new(libinput),
            interface,
            denied,
        })
    }
}

/// A libinput context created from udev.
///
/// The interface behind the open/close callbacks is released only after
/// the last libinput reference, since destroying the context closes devices.
pub struct LibinputContext {
    libinput: ManuallyDrop<Libinput>,
    interface: *mut RestrictedInterface,
    denied: DeniedSlot,
}

impl InputLibrary for LibinputContext {
    type Event = LibinputEvent;

    fn assign_seat(&mut self, seat: &str) -> io::Result<()> {
        if seat.contains('\0') {
            return Err(io::Error::from(io::ErrorKind::InvalidInput));
        }
        self.libinput
            .udev_assign_seat(seat)
            .map_err(|()| io::Error::other(format!("libinput refused seat {seat}")))
    }

    fn pollable_fd(&self) -> Option<RawFd> {
        let fd = self.libinput.as_raw_fd();
        (fd >= 0).then_some(fd)
    }

    fn dispatch(&mut self) -> io::Result<()> {
        self.libinput.dispatch()
    }

    fn next_event(&mut self) -> Option<LibinputEvent> {
        self.libinput.next().map(LibinputEvent)
    }

    fn take_access_error(&mut self) -> Option<Error> {
        self.denied.borrow_mut().take()
    }
}

impl Drop for LibinputContext {
    fn drop(&mut self) {
        // SAFETY: neither field is used again. Events are released within a
        // drain cycle, so this is the last libinput reference and the
        // context's close callbacks run before the interface is freed.
        unsafe {
            ManuallyDrop::drop(&mut self.libinput);
            drop(Box::from_raw(self.interface));
        }
    }
}

/// A libinput event, released when dropped.
pub struct LibinputEvent(Event);

impl RawEvent for LibinputEvent {
    fn kind(&self) -> EventKind {
        match &self.0 {
            Event::Gesture(GestureEvent::Swipe(swipe)) => match swipe {
                GestureSwipeEvent::Begin(_) => EventKind::SwipeBegin,
                GestureSwipeEvent::Update(_) => EventKind::SwipeUpdate,
                GestureSwipeEvent::End(_) => EventKind::SwipeEnd,
                _ => EventKind::Other,
            },
            Event::Gesture(GestureEvent::Pinch(pinch)) => match pinch {
                GesturePinchEvent::Begin(_) => EventKind::PinchBegin,
                GesturePinchEvent::Update(_) => EventKind::PinchUpdate,
                GesturePinchEvent::End(_) => EventKind::PinchEnd,
                _ => EventKind::Other,
            },
            _ => EventKind::Other,
        }
    }

    fn finger_count(&self) -> u32 {
        let count = match &self.0 {
            Event::Gesture(GestureEvent::Swipe(GestureSwipeEvent::Begin(e))) => e.finger_count(),
            Event::Gesture(GestureEvent::Pinch(GesturePinchEvent::Begin(e))) => e.finger_count(),
            _ => 0,
        };
        u32::try_from(count).unwrap_or(0)
    }

    fn device_sysname(&self) -> Option<String> {
        Some(self.0.device().sysname().to_string())
    }

    fn time_usec(&self) -> u64 {
        match &self.0 {
            Event::Gesture(GestureEvent::Swipe(GestureSwipeEvent::Begin(e))) => e.time_usec(),
            Event::Gesture(GestureEvent::Pinch(GesturePinchEvent::Begin(e))) => e.time_usec(),
            _ => 0,
        }
    }
}

/// Gather gestures from the configured seat until the wait fails (blocking).
///
/// # Example
///
/// ```no_run
/// use gesture_gatherer::{Config, Gesture, gather};
///
/// let stopped = gather(Config::default(), |gesture: Gesture| {
///     println!("{:?} with {} fingers", gesture.gesture_type, gesture.fingers);
/// })
/// .expect("Failed to gather gestures");
/// eprintln!("stopped: {}", stopped.cause);
/// ```
pub fn gather<C: GestureController>(config: Config, controller: C) -> Result<Stopped> {
    let mut backend = LibinputBackend::new();
    let mut gatherer = GestureGatherer::new(config, controller, &mut backend)?;
    gatherer.run()
}
