//! Scripted backend and waiter used by the unit tests.

use crate::access::DeviceAccess;
use crate::context::{InputBackend, InputLibrary, RawEvent};
use crate::error::{Error, InitStage};
use crate::gesture::EventKind;
use crate::wait::ReadinessWaiter;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::os::fd::{OwnedFd, RawFd};
use std::path::PathBuf;
use std::rc::Rc;

/// A low-level event with a fixed payload.
#[derive(Debug, Clone)]
pub(crate) struct MockEvent {
    kind: EventKind,
    fingers: u32,
    device: Option<String>,
    time_usec: u64,
}

impl MockEvent {
    pub(crate) fn new(kind: EventKind, fingers: u32) -> Self {
        Self {
            kind,
            fingers,
            device: None,
            time_usec: 0,
        }
    }

    pub(crate) fn swipe_begin(fingers: u32) -> Self {
        Self::new(EventKind::SwipeBegin, fingers)
    }

    pub(crate) fn swipe_update(fingers: u32) -> Self {
        Self::new(EventKind::SwipeUpdate, fingers)
    }

    pub(crate) fn on_device(mut self, sysname: &str) -> Self {
        self.device = Some(sysname.to_string());
        self
    }

    pub(crate) fn at(mut self, time_usec: u64) -> Self {
        self.time_usec = time_usec;
        self
    }
}

impl RawEvent for MockEvent {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn finger_count(&self) -> u32 {
        self.fingers
    }

    fn device_sysname(&self) -> Option<String> {
        self.device.clone()
    }

    fn time_usec(&self) -> u64 {
        self.time_usec
    }
}

#[derive(Default)]
struct Shared {
    log: RefCell<Vec<String>>,
    incoming: RefCell<VecDeque<MockEvent>>,
    hotplug: RefCell<Vec<PathBuf>>,
    open_devices: Cell<usize>,
}

impl Shared {
    fn record(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }
}

/// Backend that records every acquisition and release.
pub(crate) struct MockBackend {
    shared: Rc<Shared>,
    fail_at: Option<InitStage>,
    devices: Vec<PathBuf>,
}

impl MockBackend {
    pub(crate) const FD: RawFd = 17;

    pub(crate) fn new() -> Self {
        Self {
            shared: Rc::new(Shared::default()),
            fail_at: None,
            devices: Vec::new(),
        }
    }

    pub(crate) fn failing_at(mut self, stage: InitStage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /// Device nodes opened through the access shim on seat assignment.
    pub(crate) fn with_devices<const N: usize>(mut self, paths: [&str; N]) -> Self {
        self.devices = paths.into_iter().map(PathBuf::from).collect();
        self
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.shared.log.borrow().clone()
    }

    pub(crate) fn open_devices(&self) -> usize {
        self.shared.open_devices.get()
    }

    /// Queue events that become visible after the next dispatch.
    pub(crate) fn push_incoming(&self, events: impl IntoIterator<Item = MockEvent>) {
        self.shared.incoming.borrow_mut().extend(events);
    }

    /// A device that appears, and is opened, during the next dispatch.
    pub(crate) fn hotplug(&self, path: &str) {
        self.shared.hotplug.borrow_mut().push(PathBuf::from(path));
    }

    /// A waiter that delivers one batch per wake-up and fails once the
    /// batches run out.
    pub(crate) fn waiter(&self, batches: Vec<Vec<MockEvent>>) -> ScriptedWaiter {
        ScriptedWaiter {
            shared: self.shared.clone(),
            batches: batches.into(),
            calls: 0,
        }
    }
}

pub(crate) struct MockDeviceManager {
    shared: Rc<Shared>,
}

impl Drop for MockDeviceManager {
    fn drop(&mut self) {
        self.shared.record("release device manager");
    }
}

pub(crate) struct MockLibrary {
    shared: Rc<Shared>,
    access: Box<dyn DeviceAccess>,
    devices: Vec<PathBuf>,
    opened: Vec<OwnedFd>,
    queue: VecDeque<MockEvent>,
    denied: Option<Error>,
    fail_seat: bool,
    fail_fd: bool,
}

impl MockLibrary {
    fn open(&mut self, path: PathBuf) {
        match self.access.open_device(&path, libc::O_RDONLY | libc::O_CLOEXEC) {
            Ok(fd) => {
                self.opened.push(fd);
                self.shared.open_devices.set(self.shared.open_devices.get() + 1);
            }
            Err(err) => {
                if self.denied.is_none() {
                    self.denied = Some(err);
                }
            }
        }
    }
}

impl InputLibrary for MockLibrary {
    type Event = MockEvent;

    fn assign_seat(&mut self, seat: &str) -> io::Result<()> {
        self.shared.record(format!("assign {seat}"));
        if self.fail_seat {
            return Err(io::Error::other("seat assignment refused"));
        }
        for path in std::mem::take(&mut self.devices) {
            self.open(path);
        }
        Ok(())
    }

    fn pollable_fd(&self) -> Option<RawFd> {
        if self.fail_fd { None } else { Some(MockBackend::FD) }
    }

    fn dispatch(&mut self) -> io::Result<()> {
        let hotplugged = std::mem::take(&mut *self.shared.hotplug.borrow_mut());
        for path in hotplugged {
            self.open(path);
        }
        self.queue.extend(self.shared.incoming.borrow_mut().drain(..));
        Ok(())
    }

    fn next_event(&mut self) -> Option<MockEvent> {
        self.queue.pop_front()
    }

    fn take_access_error(&mut self) -> Option<Error> {
        self.denied.take()
    }
}

impl Drop for MockLibrary {
    fn drop(&mut self) {
        for fd in self.opened.drain(..) {
            self.access.close_device(fd);
            self.shared.open_devices.set(self.shared.open_devices.get() - 1);
        }
        self.shared.record("release library");
    }
}

impl InputBackend for MockBackend {
    type DeviceManager = MockDeviceManager;
    type Library = MockLibrary;

    fn create_device_manager(&mut self) -> Option<MockDeviceManager> {
        self.shared.record("create device manager");
        if self.fail_at == Some(InitStage::DeviceManager) {
            return None;
        }
        Some(MockDeviceManager {
            shared: self.shared.clone(),
        })
    }

    fn create_library(
        &mut self,
        _device_manager: &MockDeviceManager,
        access: Box<dyn DeviceAccess>,
    ) -> Option<MockLibrary> {
        self.shared.record("create library");
        if self.fail_at == Some(InitStage::InputLibrary) {
            return None;
        }
        Some(MockLibrary {
            shared: self.shared.clone(),
            access,
            devices: self.devices.clone(),
            opened: Vec::new(),
            queue: VecDeque::new(),
            denied: None,
            fail_seat: self.fail_at == Some(InitStage::SeatBind),
            fail_fd: self.fail_at == Some(InitStage::DescriptorFetch),
        })
    }
}

/// Readiness waiter driven by a script of event batches.
pub(crate) struct ScriptedWaiter {
    shared: Rc<Shared>,
    batches: VecDeque<Vec<MockEvent>>,
    calls: usize,
}

impl ScriptedWaiter {
    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

impl ReadinessWaiter for ScriptedWaiter {
    fn wait_for_data(&mut self, fd: RawFd) -> io::Result<()> {
        assert_eq!(fd, MockBackend::FD);
        self.calls += 1;
        match self.batches.pop_front() {
            Some(batch) => {
                self.shared.incoming.borrow_mut().extend(batch);
                Ok(())
            }
            None => Err(io::Error::from_raw_os_error(libc::EBADF)),
        }
    }
}
