// Discovered package names. Populated on first successful lookup and kept
// for the life of the process; a reinstall under a new name goes unnoticed.

use dashmap::DashMap;

use crate::model::{DeviceId, StreamingApp};

#[derive(Debug, Default)]
pub struct PackageCache {
    entries: DashMap<(DeviceId, StreamingApp), String>,
}

impl PackageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, device: &DeviceId, app: StreamingApp) -> Option<String> {
        self.entries
            .get(&(device.clone(), app))
            .map(|pkg| pkg.value().clone())
    }

    pub fn insert(&self, device: DeviceId, app: StreamingApp, package: String) {
        self.entries.insert((device, app), package);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
