// Short-lived device status cache. Entries expire by age only.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::model::{DeviceId, DeviceStatus};

#[derive(Debug)]
struct Entry {
    status: DeviceStatus,
    fetched_at: Instant,
}

/// Per-device status snapshots with a fixed time-to-live.
#[derive(Debug)]
pub struct StatusCache {
    ttl: Duration,
    entries: DashMap<DeviceId, Entry>,
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached status if it is younger than the TTL.
    pub fn get(&self, device: &DeviceId) -> Option<DeviceStatus> {
        let entry = self.entries.get(device)?;
        (entry.fetched_at.elapsed() < self.ttl).then(|| entry.status.clone())
    }

    pub fn insert(&self, device: DeviceId, status: DeviceStatus) {
        self.entries.insert(
            device,
            Entry {
                status,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScreenState;

    fn on() -> DeviceStatus {
        DeviceStatus {
            screen: ScreenState::On,
            ..DeviceStatus::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = StatusCache::new(Duration::from_secs(2));
        let id = DeviceId::from("den");
        cache.insert(id.clone(), on());

        tokio::time::advance(Duration::from_millis(1900)).await;
        assert_eq!(cache.get(&id), Some(on()));

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(cache.get(&id), None);
    }

    #[tokio::test(start_paused = true)]
    async fn devices_are_independent() {
        let cache = StatusCache::default();
        cache.insert(DeviceId::from("den"), on());

        assert!(cache.get(&DeviceId::from("den")).is_some());
        assert!(cache.get(&DeviceId::from("attic")).is_none());
        assert_eq!(cache.len(), 1);
    }
}
