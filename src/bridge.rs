//! The inbound request surface.
//!
//! The mobile side of the bridge sends requests by name over its messaging channel, one at a
//! time. Each name maps onto the closed [`Request`] alphabet below; anything outside it fails
//! with [`NotImplemented`][crate::error::ErrorKind::NotImplemented] rather than crashing the
//! channel handler.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::DiscoveryAdapter;
use crate::error::ErrorKind;
use crate::notifier::{LogNotifier, Notifier};
use crate::permissions::{
    required_permissions, AlwaysGranted, Permission, PermissionGate, PlatformConfig,
};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::session::{ScanSession, DEFAULT_SCAN_PERIOD};
use crate::{Error, Result};

/// The closed set of requests the mobile side may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// List the devices currently bonded with the host
    GetPairedDevices,
    /// Power the radio on if it is off
    EnableBluetooth,
    /// Request any missing Bluetooth permissions from the user
    RequestPermissions,
    /// Start a scan session
    StartScan,
    /// Stop the scan session
    StopScan,
    /// Snapshot the current scan results
    GetScanResults,
}

impl Request {
    /// The wire name of this request on the messaging channel.
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetPairedDevices => "getPairedDevices",
            Request::EnableBluetooth => "enableBluetooth",
            Request::RequestPermissions => "requestBluetoothPermissions",
            Request::StartScan => "startScan",
            Request::StopScan => "stopScan",
            Request::GetScanResults => "getScanResults",
        }
    }

    /// Maps a wire name onto the request alphabet.
    ///
    /// Unknown names fail with [`NotImplemented`][ErrorKind::NotImplemented].
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "getPairedDevices" => Ok(Request::GetPairedDevices),
            "enableBluetooth" => Ok(Request::EnableBluetooth),
            "requestBluetoothPermissions" => Ok(Request::RequestPermissions),
            "startScan" => Ok(Request::StartScan),
            "stopScan" => Ok(Request::StopScan),
            "getScanResults" => Ok(Request::GetScanResults),
            _ => Err(Error::new(
                ErrorKind::NotImplemented,
                None,
                format!("unknown request {name:?}"),
            )),
        }
    }
}

impl FromStr for Request {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Request::from_name(s)
    }
}

/// A successful reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Acknowledgement with no payload
    Done,
    /// Rendered `"name - address"` labels, one per device
    Devices(Vec<String>),
}

/// Construction parameters for a [`Bridge`].
///
/// Only the collaborators the host actually has need to be filled in; the rest default to
/// no adapter, an [`AlwaysGranted`] permission gate, a [`LogNotifier`], the Tokio scheduler,
/// an unversioned platform, and the default scan period.
pub struct BridgeConfig {
    /// The radio capability, absent on hosts without Bluetooth
    pub adapter: Option<Arc<dyn DiscoveryAdapter>>,
    /// The host's permission checks and request dialog
    pub permissions: Arc<dyn PermissionGate>,
    /// The host's notification surface
    pub notifier: Arc<dyn Notifier>,
    /// The expiry scheduler; `None` uses a [`TokioScheduler`] on the current runtime
    pub scheduler: Option<Arc<dyn Scheduler>>,
    /// Platform facts used to resolve the required permission set
    pub platform: PlatformConfig,
    /// How long each scan generation runs before stopping itself
    pub scan_period: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            adapter: None,
            permissions: Arc::new(AlwaysGranted),
            notifier: Arc::new(LogNotifier),
            scheduler: None,
            platform: PlatformConfig::default(),
            scan_period: DEFAULT_SCAN_PERIOD,
        }
    }
}

/// Dispatches the six named bridge operations onto the scan session and its collaborators.
///
/// Created once at application startup and kept for the life of the messaging channel.
pub struct Bridge {
    adapter: Option<Arc<dyn DiscoveryAdapter>>,
    permissions: Arc<dyn PermissionGate>,
    notifier: Arc<dyn Notifier>,
    required: Vec<Permission>,
    session: Arc<ScanSession>,
}

impl Bridge {
    /// Builds a bridge and its scan session from `config`.
    ///
    /// The required permission set is resolved here, once, from the platform config.
    ///
    /// # Panics
    ///
    /// Panics when `config.scheduler` is `None` and no Tokio runtime is entered.
    pub fn with_config(config: BridgeConfig) -> Self {
        let scheduler = config
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));
        let session = ScanSession::with_scan_period(
            config.adapter.clone(),
            scheduler,
            config.notifier.clone(),
            config.scan_period,
        );

        Bridge {
            adapter: config.adapter,
            permissions: config.permissions,
            notifier: config.notifier,
            required: required_permissions(&config.platform),
            session,
        }
    }

    /// The scan session this bridge dispatches to.
    ///
    /// The host's platform layer needs this to feed discovery events, typically via
    /// [`ScanSession::pump`].
    pub fn session(&self) -> &Arc<ScanSession> {
        &self.session
    }

    /// The permissions this platform requires, resolved at construction.
    pub fn required_permissions(&self) -> &[Permission] {
        &self.required
    }

    /// Handles one request from the messaging channel.
    pub fn handle(&self, request: Request) -> Result<Response> {
        match request {
            Request::GetPairedDevices => Ok(Response::Devices(self.paired_devices())),
            Request::EnableBluetooth => {
                self.enable_bluetooth()?;
                Ok(Response::Done)
            }
            Request::RequestPermissions => {
                self.request_permissions()?;
                Ok(Response::Done)
            }
            Request::StartScan => {
                self.session.start();
                Ok(Response::Done)
            }
            Request::StopScan => {
                self.session.stop();
                Ok(Response::Done)
            }
            Request::GetScanResults => Ok(Response::Devices(
                self.session.results().iter().map(|s| s.to_string()).collect(),
            )),
        }
    }

    /// Handles a request arriving as a wire name.
    pub fn handle_named(&self, name: &str) -> Result<Response> {
        self.handle(Request::from_name(name)?)
    }

    /// Reports the outcome of a permission request back to the user.
    ///
    /// Hosts call this from their grant-result callback once the user has dismissed the
    /// permission dialog triggered by [`Request::RequestPermissions`].
    pub fn on_permissions_result(&self, outcomes: &[(Permission, bool)]) {
        if outcomes.iter().all(|(_, granted)| *granted) {
            self.notifier.notify("Bluetooth permissions granted");
        } else {
            self.notifier.notify("Bluetooth permissions denied");
        }
    }

    fn paired_devices(&self) -> Vec<String> {
        match &self.adapter {
            Some(adapter) if adapter.is_enabled() => {
                adapter.paired_devices().iter().map(|d| d.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    fn enable_bluetooth(&self) -> Result<()> {
        let Some(adapter) = &self.adapter else {
            return Err(ErrorKind::AdapterUnavailable.into());
        };
        if !adapter.is_enabled() {
            adapter.enable()?;
        }
        Ok(())
    }

    fn request_permissions(&self) -> Result<()> {
        let missing: Vec<Permission> = self
            .required
            .iter()
            .copied()
            .filter(|p| !self.permissions.is_granted(*p))
            .collect();

        if missing.is_empty() {
            self.notifier.notify("Bluetooth permissions already granted");
            return Ok(());
        }
        self.permissions.request(&missing)
    }
}
