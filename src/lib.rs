#![warn(missing_docs)]

//! Blebridge is the host-side half of a Bluetooth Low Energy (BLE) scanning bridge for
//! cross-platform mobile applications. The embedding application forwards a small set of
//! named requests (start a scan, stop a scan, list paired devices, ...) over its messaging
//! channel; this crate owns the state those requests act on.
//!
//! The heart of the crate is [`ScanSession`]: a timed discovery session that accumulates
//! deduplicated [`DeviceSighting`]s from an asynchronous, possibly-batched, possibly-failing
//! event stream and stops itself after a fixed period. Everything the session needs from the
//! outside world is narrowed to three collaborator traits: [`DiscoveryAdapter`] performs the
//! radio operations, [`Scheduler`] runs the one-shot expiry callback, and [`Notifier`]
//! surfaces user-visible notices.
//!
//! # Usage
//!
//! ```rust,no_run
//!# use std::sync::Arc;
//!# use blebridge::{Bridge, BridgeConfig, PlatformConfig, Request, Response};
//!# fn adapter() -> Arc<dyn blebridge::DiscoveryAdapter> { unimplemented!() }
//!# fn permissions() -> Arc<dyn blebridge::PermissionGate> { unimplemented!() }
//!# #[tokio::main]
//!# async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!let bridge = Bridge::with_config(BridgeConfig {
//!    adapter: Some(adapter()),
//!    permissions: permissions(),
//!    platform: PlatformConfig { api_level: 34 },
//!    ..BridgeConfig::default()
//!});
//!
//!bridge.handle_named("startScan")?;
//!// ... discovery events arrive through the session's event pump ...
//!if let Response::Devices(found) = bridge.handle(Request::GetScanResults)? {
//!    for label in found {
//!        println!("{label}");
//!    }
//!}
//!#
//!#    Ok(())
//!# }
//! ```
//!
//! # Overview
//!
//! The primary pieces provided by blebridge are:
//!
//! - The scan session:
//!   - [Starting][ScanSession::start] and [stopping][ScanSession::stop] a timed discovery
//!     session, idempotent in both directions
//!   - [Ingesting][ScanSession::handle_event] single, batched, and failure events
//!   - [Snapshotting][ScanSession::results] the deduplicated sightings in first-seen order
//! - The request surface:
//!   - A closed [`Request`] alphabet mapped from the wire names the mobile side sends
//!   - [`Bridge::handle`] dispatching each request to the session or a collaborator
//! - The collaborator seams:
//!   - [`DiscoveryAdapter`] for radio control and paired-device enumeration
//!   - [`Scheduler`] for the expiry timer, with [`TokioScheduler`] as the default
//!   - [`Notifier`] for toast-style notices, with [`LogNotifier`] as the default
//!   - [`PermissionGate`] plus a [capability list][required_permissions] resolved once at
//!     startup
//!
//! # Feature flags
//!
//! The `serde` feature is available to enable serializing/deserializing device sightings.
//!
//! # Examples
//!
//! A runnable demonstration with a scripted adapter is available in the `demos` folder.

pub mod adapter;
pub mod bridge;
pub mod error;
pub mod notifier;
pub mod permissions;
pub mod scheduler;
pub mod session;

use std::fmt;

pub use adapter::DiscoveryAdapter;
pub use bridge::{Bridge, BridgeConfig, Request, Response};
pub use error::{Error, ScanFailure, ScanFailureCode};
pub use notifier::{LogNotifier, Notifier};
pub use permissions::{required_permissions, Permission, PermissionGate, PlatformConfig};
pub use scheduler::{ScheduleHandle, Scheduler, TokioScheduler};
pub use session::{ScanSession, ScanState};

/// Convenience alias for a result with [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// One reported observation of a device during a discovery session.
///
/// Sightings are unique per session by [`address`][Self::address]; the advertised name is a
/// display label only and may be absent or change between advertisements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSighting {
    /// The advertised local name of the device, if any
    pub name: Option<String>,
    /// The hardware identifier reported by the adapter
    pub address: String,
}

impl DeviceSighting {
    /// Creates a sighting from an advertised name and hardware address.
    pub fn new(name: impl Into<Option<String>>, address: impl Into<String>) -> Self {
        DeviceSighting {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for DeviceSighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name.as_deref().unwrap_or("(unknown)"), self.address)
    }
}

/// Events delivered asynchronously by a [`DiscoveryAdapter`] while discovery is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A single device sighting
    Sighting(DeviceSighting),
    /// A batch of sightings delivered together; applied element by element in order
    Batch(Vec<DeviceSighting>),
    /// Discovery reported a failure; the session state is left as-is
    Failed(ScanFailure),
}
