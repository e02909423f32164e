//! The timed discovery session.
//!
//! A [`ScanSession`] is created once at bridge startup and lives for the life of the process.
//! Each call to [`start`][ScanSession::start] opens a new *generation* of the session: prior
//! results are cleared, a one-shot expiry is armed, and the adapter is instructed to begin
//! discovery. Sightings delivered while the session is scanning accumulate deduplicated and
//! in first-seen order until either an explicit [`stop`][ScanSession::stop] or the expiry
//! ends the generation.
//!
//! All state lives behind a single mutex. Lifecycle calls, event ingestion, and the expiry
//! callback serialize on it, so a `start` racing with in-flight events from the previous
//! generation cannot straddle the clear-on-start boundary. The expiry callback captures the
//! generation it was armed for and re-checks it under the lock when it fires; a timer
//! outliving a manual stop can never shut down a newer generation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use futures_core::Stream;
use futures_lite::StreamExt;
use tracing::{debug, warn};

use crate::adapter::DiscoveryAdapter;
use crate::notifier::Notifier;
use crate::scheduler::{ScheduleHandle, Scheduler};
use crate::{DeviceSighting, ScanEvent};

/// How long a scan runs before stopping itself, unless configured otherwise.
pub const DEFAULT_SCAN_PERIOD: Duration = Duration::from_millis(10_000);

/// Lifecycle state of a [`ScanSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScanState {
    /// No discovery running, no expiry armed
    Idle,
    /// Discovery running, counting toward the automatic stop
    Scanning,
}

struct SessionInner {
    state: ScanState,
    generation: u64,
    results: Vec<DeviceSighting>,
    seen: HashSet<String>,
    expiry: Option<ScheduleHandle>,
}

/// A timed BLE discovery session with deduplicated results.
///
/// Discovery is active on the adapter if and only if the session is
/// [`Scanning`][ScanState::Scanning]. `start` and `stop` are idempotent, and both return as
/// soon as the state is updated and the adapter/scheduler instructions are issued.
pub struct ScanSession {
    adapter: Option<Arc<dyn DiscoveryAdapter>>,
    scheduler: Arc<dyn Scheduler>,
    notifier: Arc<dyn Notifier>,
    scan_period: Duration,
    // Handed to expiry callbacks; a timer must not keep a dead session alive.
    weak_self: Weak<ScanSession>,
    inner: Mutex<SessionInner>,
}

impl ScanSession {
    /// Creates a session that stops itself after [`DEFAULT_SCAN_PERIOD`].
    pub fn new(
        adapter: Option<Arc<dyn DiscoveryAdapter>>,
        scheduler: Arc<dyn Scheduler>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        Self::with_scan_period(adapter, scheduler, notifier, DEFAULT_SCAN_PERIOD)
    }

    /// Creates a session with a custom scan period.
    pub fn with_scan_period(
        adapter: Option<Arc<dyn DiscoveryAdapter>>,
        scheduler: Arc<dyn Scheduler>,
        notifier: Arc<dyn Notifier>,
        scan_period: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| ScanSession {
            adapter,
            scheduler,
            notifier,
            scan_period,
            weak_self: weak_self.clone(),
            inner: Mutex::new(SessionInner {
                state: ScanState::Idle,
                generation: 0,
                results: Vec::new(),
                seen: HashSet::new(),
                expiry: None,
            }),
        })
    }

    /// Starts a new scan generation.
    ///
    /// Clears prior results, arms the expiry, instructs the adapter to begin discovery, and
    /// returns. A no-op when already scanning or when no adapter is configured. Adapter
    /// failures to begin discovery arrive later as [`ScanEvent::Failed`], never from this
    /// call.
    pub fn start(&self) {
        let Some(adapter) = &self.adapter else {
            debug!("no Bluetooth adapter, scan request ignored");
            return;
        };

        let mut inner = self.inner.lock().unwrap();
        if inner.state == ScanState::Scanning {
            return;
        }

        inner.results.clear();
        inner.seen.clear();
        inner.generation += 1;

        let generation = inner.generation;
        let session = self.weak_self.clone();
        let expiry = self.scheduler.schedule(
            self.scan_period,
            Box::new(move || expire(&session, generation)),
        );

        inner.expiry = Some(expiry);
        inner.state = ScanState::Scanning;
        adapter.begin_discovery();
        debug!("started scan generation {generation}, auto-stop in {:?}", self.scan_period);
        self.notifier.notify("Scanning for BLE devices...");
    }

    /// Stops the current scan generation. A no-op when already idle.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != ScanState::Scanning {
            return;
        }

        if let Some(expiry) = inner.expiry.take() {
            expiry.cancel();
        }
        self.end_generation(&mut inner);
    }

    /// The expiry path. Runs the equivalent of [`stop`][Self::stop] exactly once for the
    /// generation the timer was armed for; anything else means a manual stop already won.
    fn on_expiry(&self, generation: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != ScanState::Scanning || inner.generation != generation {
            debug!("expiry for superseded scan generation {generation} ignored");
            return;
        }

        inner.expiry = None;
        self.end_generation(&mut inner);
    }

    fn end_generation(&self, inner: &mut SessionInner) {
        inner.state = ScanState::Idle;
        if let Some(adapter) = &self.adapter {
            adapter.end_discovery();
        }
        debug!("stopped scan generation {}", inner.generation);
        self.notifier.notify("BLE scan stopped");
    }

    /// Applies one adapter event to the session.
    ///
    /// Sightings arriving after the session has gone idle are dropped; failure notices are
    /// surfaced through the notifier without touching the scan state, since the adapter may
    /// or may not still be discovering.
    pub fn handle_event(&self, event: ScanEvent) {
        match event {
            ScanEvent::Sighting(sighting) => self.ingest(std::iter::once(sighting)),
            ScanEvent::Batch(sightings) => self.ingest(sightings),
            ScanEvent::Failed(failure) => {
                warn!("discovery failed: {failure}");
                self.notifier.notify(&format!("BLE scan failed with error: {failure}"));
            }
        }
    }

    fn ingest(&self, sightings: impl IntoIterator<Item = DeviceSighting>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != ScanState::Scanning {
            debug!("sighting after scan end dropped");
            return;
        }

        for sighting in sightings {
            // Unique by hardware address; a renamed device is still the same device.
            if inner.seen.insert(sighting.address.clone()) {
                inner.results.push(sighting);
            }
        }
    }

    /// A snapshot of the current generation's sightings in first-seen order.
    pub fn results(&self) -> Vec<DeviceSighting> {
        self.inner.lock().unwrap().results.clone()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ScanState {
        self.inner.lock().unwrap().state
    }

    /// Whether a scan generation is currently open.
    pub fn is_scanning(&self) -> bool {
        self.state() == ScanState::Scanning
    }

    /// Forwards every event from `events` into [`handle_event`][Self::handle_event] until the
    /// stream ends.
    ///
    /// Pair this with [`event_channel`] to connect a platform scan callback to the session.
    pub async fn pump<S>(&self, mut events: S)
    where
        S: Stream<Item = ScanEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.handle_event(event);
        }
        debug!("scan event stream ended");
    }
}

fn expire(session: &Weak<ScanSession>, generation: u64) {
    if let Some(session) = session.upgrade() {
        session.on_expiry(generation);
    }
}

/// Creates the bounded channel pair connecting a platform scan callback to the session.
///
/// The sending half lives in the platform layer, which should deliver with `try_send` (a
/// callback thread must not block on a slow consumer); the receiving half is handed to
/// [`ScanSession::pump`].
pub fn event_channel() -> (async_channel::Sender<ScanEvent>, async_channel::Receiver<ScanEvent>) {
    async_channel::bounded(16)
}
