//! Startup-resolved Bluetooth capability requirements.
//!
//! Which runtime permissions a host needs for BLE discovery depends on the platform version.
//! Rather than branching on the version wherever permissions are touched, the bridge resolves
//! the required set once from a [`PlatformConfig`] at startup and carries it around as plain
//! data. Checking and requesting permissions stays with the host behind [`PermissionGate`].

use std::fmt;

use crate::Result;

/// A runtime permission the host OS may require before Bluetooth operations.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Basic Bluetooth usage
    Bluetooth,
    /// Bluetooth administration (enabling the radio, initiating discovery)
    BluetoothAdmin,
    /// Scanning for nearby devices (runtime permission on newer platform versions)
    BluetoothScan,
    /// Connecting to and enumerating bonded devices (runtime permission on newer platform versions)
    BluetoothConnect,
}

impl Permission {
    /// The manifest-style name of this permission.
    pub fn name(&self) -> &'static str {
        match self {
            Permission::Bluetooth => "BLUETOOTH",
            Permission::BluetoothAdmin => "BLUETOOTH_ADMIN",
            Permission::BluetoothScan => "BLUETOOTH_SCAN",
            Permission::BluetoothConnect => "BLUETOOTH_CONNECT",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host platform facts resolved once at bridge startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformConfig {
    /// The platform API level, `0` when the host has no versioned permission model.
    pub api_level: i32,
}

/// API level at which scanning and connecting became dedicated runtime permissions.
const RUNTIME_SCAN_PERMISSIONS: i32 = 31;

/// Resolves the permissions required for scanning and paired-device enumeration on `platform`.
pub fn required_permissions(platform: &PlatformConfig) -> Vec<Permission> {
    let mut permissions = vec![Permission::Bluetooth, Permission::BluetoothAdmin];
    if platform.api_level >= RUNTIME_SCAN_PERMISSIONS {
        permissions.push(Permission::BluetoothScan);
        permissions.push(Permission::BluetoothConnect);
    }
    permissions
}

/// Host-side permission checks and requests.
///
/// The bridge decides *which* permissions are missing; showing the request dialog and
/// reporting the outcome belongs to the host. The scan session itself never consults the
/// gate: by the time a scan is started the host is expected to have settled permissions, and
/// an unauthorized scan surfaces as a discovery failure event.
pub trait PermissionGate: Send + Sync {
    /// Whether `permission` is currently granted.
    fn is_granted(&self, permission: Permission) -> bool;

    /// Asks the host to request `permissions` from the user.
    fn request(&self, permissions: &[Permission]) -> Result<()>;
}

/// [`PermissionGate`] for hosts without a runtime permission model.
///
/// Reports every permission as granted and treats requests as already satisfied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

impl PermissionGate for AlwaysGranted {
    fn is_granted(&self, _permission: Permission) -> bool {
        true
    }

    fn request(&self, _permissions: &[Permission]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_platforms_need_only_the_base_permissions() {
        let resolved = required_permissions(&PlatformConfig { api_level: 30 });
        assert_eq!(resolved, vec![Permission::Bluetooth, Permission::BluetoothAdmin]);
    }

    #[test]
    fn newer_platforms_add_the_runtime_scan_permissions() {
        let resolved = required_permissions(&PlatformConfig { api_level: 31 });
        assert_eq!(
            resolved,
            vec![
                Permission::Bluetooth,
                Permission::BluetoothAdmin,
                Permission::BluetoothScan,
                Permission::BluetoothConnect,
            ]
        );
    }
}
