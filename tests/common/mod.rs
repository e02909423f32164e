//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)] // each test file uses a different subset

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use blebridge::scheduler::ExpiryCallback;
use blebridge::{
    DeviceSighting, DiscoveryAdapter, Notifier, Permission, PermissionGate, ScheduleHandle,
    Scheduler,
};

pub fn sighting(name: &str, address: &str) -> DeviceSighting {
    DeviceSighting::new(name.to_string(), address)
}

pub fn unnamed_sighting(address: &str) -> DeviceSighting {
    DeviceSighting::new(None, address)
}

/// Adapter that records the instructions issued to it.
#[derive(Default)]
pub struct FakeAdapter {
    enabled: AtomicBool,
    begins: AtomicUsize,
    ends: AtomicUsize,
    enables: AtomicUsize,
    bonded: Vec<DeviceSighting>,
}

impl FakeAdapter {
    pub fn enabled() -> Arc<Self> {
        Arc::new(FakeAdapter {
            enabled: AtomicBool::new(true),
            ..Default::default()
        })
    }

    pub fn disabled() -> Arc<Self> {
        Arc::new(FakeAdapter::default())
    }

    pub fn with_bonded(bonded: Vec<DeviceSighting>) -> Arc<Self> {
        Arc::new(FakeAdapter {
            enabled: AtomicBool::new(true),
            bonded,
            ..Default::default()
        })
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }

    pub fn enables(&self) -> usize {
        self.enables.load(Ordering::SeqCst)
    }
}

impl DiscoveryAdapter for FakeAdapter {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn enable(&self) -> blebridge::Result<()> {
        self.enables.fetch_add(1, Ordering::SeqCst);
        self.enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn begin_discovery(&self) {
        self.begins.fetch_add(1, Ordering::SeqCst);
    }

    fn end_discovery(&self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }

    fn paired_devices(&self) -> Vec<DeviceSighting> {
        self.bonded.clone()
    }
}

/// Scheduler whose timers only fire when the test says so.
#[derive(Default)]
pub struct ManualScheduler {
    armed: Mutex<Vec<(ScheduleHandle, ExpiryCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(ManualScheduler::default())
    }

    /// Timers armed and neither fired nor cancelled.
    pub fn armed_count(&self) -> usize {
        self.armed
            .lock()
            .unwrap()
            .iter()
            .filter(|(handle, _)| !handle.is_cancelled())
            .count()
    }

    /// Fires the oldest armed timer, honoring cancellation.
    pub fn fire_next(&self) {
        let entry = {
            let mut armed = self.armed.lock().unwrap();
            if armed.is_empty() {
                return;
            }
            armed.remove(0)
        };
        let (handle, callback) = entry;
        if !handle.is_cancelled() {
            callback();
        }
    }

    /// Fires the oldest timer even if it was cancelled, simulating a callback already in
    /// flight when the cancel landed.
    pub fn force_fire_next(&self) {
        let entry = {
            let mut armed = self.armed.lock().unwrap();
            if armed.is_empty() {
                return;
            }
            armed.remove(0)
        };
        let (_, callback) = entry;
        callback();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, _delay: Duration, callback: ExpiryCallback) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        self.armed.lock().unwrap().push((handle.clone(), callback));
        handle
    }
}

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingNotifier::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Permission gate with a scripted grant set.
#[derive(Default)]
pub struct FakeGate {
    granted: Mutex<HashSet<Permission>>,
    requested: Mutex<Vec<Vec<Permission>>>,
}

impl FakeGate {
    pub fn granting(granted: impl IntoIterator<Item = Permission>) -> Arc<Self> {
        Arc::new(FakeGate {
            granted: Mutex::new(granted.into_iter().collect()),
            requested: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Vec<Permission>> {
        self.requested.lock().unwrap().clone()
    }
}

impl PermissionGate for FakeGate {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted.lock().unwrap().contains(&permission)
    }

    fn request(&self, permissions: &[Permission]) -> blebridge::Result<()> {
        self.requested.lock().unwrap().push(permissions.to_vec());
        Ok(())
    }
}
