// ── Device identity and registry ──

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Default debug-bridge TCP port.
pub const DEFAULT_ADB_PORT: u16 = 5555;

// ── DeviceId ────────────────────────────────────────────────────────

/// Configured identifier of a TV (e.g. `fire_tv`, `living_room`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── DevicePlatform ──────────────────────────────────────────────────

/// Which Android TV flavour a device runs. Drives a few app-specific
/// fallbacks (explicit activity names differ between vendors).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DevicePlatform {
    FireTv,
    GoogleTv,
}

impl DevicePlatform {
    /// Guess the platform from a configured identifier: anything mentioning
    /// "fire" is a Fire TV, everything else is treated as Google TV.
    pub fn infer(id: &str) -> Self {
        if id.to_ascii_lowercase().contains("fire") {
            Self::FireTv
        } else {
            Self::GoogleTv
        }
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// A configured TV. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub platform: DevicePlatform,
}

impl Device {
    /// Create a device, inferring its platform from the identifier.
    pub fn new(
        id: impl Into<DeviceId>,
        host: impl Into<String>,
        port: u16,
        name: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let platform = DevicePlatform::infer(id.as_str());
        Self {
            id,
            host: host.into(),
            port,
            name: name.into(),
            platform,
        }
    }

    pub fn with_platform(mut self, platform: DevicePlatform) -> Self {
        self.platform = platform;
        self
    }

    /// The `host:port` serial the bridge addresses this device by.
    pub fn serial(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── DeviceRegistry ──────────────────────────────────────────────────

/// Lookup table from identifier to device, in configuration order.
///
/// Unknown identifiers are a hard error, never silently defaulted.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<DeviceId, Arc<Device>>,
}

impl DeviceRegistry {
    pub fn new(devices: impl IntoIterator<Item = Device>) -> Result<Self, CoreError> {
        let mut map = IndexMap::new();
        for device in devices {
            let id = device.id.clone();
            if map.insert(id.clone(), Arc::new(device)).is_some() {
                return Err(CoreError::Config {
                    message: format!("duplicate device identifier '{id}'"),
                });
            }
        }
        Ok(Self { devices: map })
    }

    /// Resolve an identifier to its device.
    pub fn get(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.devices
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownDevice {
                identifier: id.to_owned(),
                available: self.ids().join(", "),
            })
    }

    pub fn ids(&self) -> Vec<String> {
        self.devices.keys().map(ToString::to_string).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn platform_is_inferred_from_id() {
        assert_eq!(DevicePlatform::infer("fire_tv"), DevicePlatform::FireTv);
        assert_eq!(DevicePlatform::infer("Bedroom-FireStick"), DevicePlatform::FireTv);
        assert_eq!(DevicePlatform::infer("google_tv"), DevicePlatform::GoogleTv);
    }

    #[test]
    fn serial_is_host_and_port() {
        let d = Device::new("fire_tv", "192.168.1.20", 5555, "Living Room");
        assert_eq!(d.serial(), "192.168.1.20:5555");
    }

    #[test]
    fn unknown_device_lists_available() {
        let reg = DeviceRegistry::new([
            Device::new("fire_tv", "10.0.0.2", 5555, "Fire"),
            Device::new("google_tv", "10.0.0.3", 5555, "Google"),
        ])
        .unwrap();

        let err = reg.get("kitchen").unwrap_err();
        match err {
            CoreError::UnknownDevice { identifier, available } => {
                assert_eq!(identifier, "kitchen");
                assert_eq!(available, "fire_tv, google_tv");
            }
            other => panic!("expected UnknownDevice, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = DeviceRegistry::new([
            Device::new("tv", "10.0.0.2", 5555, "A"),
            Device::new("tv", "10.0.0.3", 5555, "B"),
        ]);
        assert!(matches!(result, Err(CoreError::Config { .. })));
    }
}
