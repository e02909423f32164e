//! The radio-side collaborator contract.

use crate::{DeviceSighting, Result};

/// Host-platform Bluetooth capability the bridge drives.
///
/// Implementations wrap whatever the platform provides (a BlueZ session, a WinRT watcher, a
/// JNI scanner handle) behind instruction-style methods: each call updates the radio and
/// returns immediately. Discovery results are *not* returned from these methods; the platform
/// layer delivers them asynchronously as [`ScanEvent`][crate::ScanEvent]s, typically through
/// the channel pair from [`session::event_channel`][crate::session::event_channel]. A failure
/// to begin discovery is likewise delivered as [`ScanEvent::Failed`][crate::ScanEvent],
/// mirroring how platform scanners report errors to their callbacks rather than to the
/// caller of `startScan`.
pub trait DiscoveryAdapter: Send + Sync {
    /// Whether the radio is present and powered on.
    fn is_enabled(&self) -> bool;

    /// Powers the radio on if it is currently off.
    ///
    /// Returns [`AdapterUnavailable`][crate::error::ErrorKind::AdapterUnavailable] if the
    /// radio cannot be brought up.
    fn enable(&self) -> Result<()>;

    /// Begins BLE discovery.
    ///
    /// Must not block. Failures are reported asynchronously through the event stream, never
    /// from this call.
    fn begin_discovery(&self);

    /// Ends BLE discovery. Idempotent; safe to call when discovery is already stopped.
    fn end_discovery(&self);

    /// Enumerates the devices currently bonded with the host.
    fn paired_devices(&self) -> Vec<DeviceSighting>;
}
