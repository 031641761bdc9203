use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tracing::{debug, info};

use crate::model::device::DeviceRecord;
use crate::storage::{read_json_or_default, write_json, KeyValueStore, DEVICES_KEY};

/// Drop stale records, append `record`, keep the newest `max` entries.
///
/// A record is stale once `now - last_active_ts >= stale_after`.
pub fn prune_and_append(
    mut devices: Vec<DeviceRecord>,
    record: DeviceRecord,
    now_ms: i64,
    stale_after: Duration,
    max: usize,
) -> Vec<DeviceRecord> {
    devices.retain(|d| is_fresh(d, now_ms, stale_after));
    devices.push(record);
    if devices.len() > max {
        let excess = devices.len() - max;
        devices.drain(..excess);
    }
    devices
}

fn is_fresh(device: &DeviceRecord, now_ms: i64, stale_after: Duration) -> bool {
    now_ms - device.last_active_ts < stale_after.num_milliseconds()
}

/// Capped, age-pruned list of devices persisted under `ceo_active_devices`.
/// Order is insertion order; the newest device is last.
#[derive(Clone)]
pub struct DeviceRegistry {
    store: Arc<dyn KeyValueStore>,
    max_devices: usize,
    stale_after: Duration,
}

impl DeviceRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, max_devices: usize, stale_after: Duration) -> Self {
        Self {
            store,
            max_devices,
            stale_after,
        }
    }

    pub fn max_devices(&self) -> usize {
        self.max_devices
    }

    /// Every stored record, stale ones included.
    pub fn list(&self) -> Vec<DeviceRecord> {
        read_json_or_default(self.store.as_ref(), DEVICES_KEY)
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }

    pub fn get(&self, id: &str) -> Option<DeviceRecord> {
        self.list().into_iter().find(|d| d.id == id)
    }

    /// Records still inside the activity window. Does not persist.
    pub fn active(&self, now_ms: i64) -> Vec<DeviceRecord> {
        let mut devices = self.list();
        devices.retain(|d| is_fresh(d, now_ms, self.stale_after));
        devices
    }

    pub fn has_capacity(&self, now_ms: i64) -> bool {
        self.active(now_ms).len() < self.max_devices
    }

    /// Login-time bookkeeping. Re-registering a known id replaces its record.
    pub fn register(&self, record: DeviceRecord, now_ms: i64) -> Result<Vec<DeviceRecord>> {
        let mut devices = self.list();
        devices.retain(|d| d.id != record.id);

        let before = devices.len();
        let id = record.id.clone();
        let devices = prune_and_append(devices, record, now_ms, self.stale_after, self.max_devices);
        write_json(self.store.as_ref(), DEVICES_KEY, &devices)?;

        info!(
            device_id = %id,
            kept = devices.len(),
            dropped = (before + 1).saturating_sub(devices.len()),
            "device registered"
        );
        Ok(devices)
    }

    /// Refresh `last_active_ts` for `id`. Returns false when unknown.
    pub fn touch(&self, id: &str, now_ms: i64) -> Result<bool> {
        let mut devices = self.list();
        let mut found = false;
        for device in devices.iter_mut().filter(|d| d.id == id) {
            device.last_active_ts = now_ms;
            found = true;
        }
        if found {
            write_json(self.store.as_ref(), DEVICES_KEY, &devices)?;
        }
        Ok(found)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut devices = self.list();
        let before = devices.len();
        devices.retain(|d| d.id != id);
        let removed = devices.len() != before;
        if removed {
            write_json(self.store.as_ref(), DEVICES_KEY, &devices)?;
            debug!(device_id = %id, "device removed");
        }
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(DEVICES_KEY)?;
        info!("all devices removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const HOUR: i64 = 3_600_000;
    const NOW: i64 = 1_700_000_000_000;

    fn device(id: &str, last_active_ts: i64) -> DeviceRecord {
        DeviceRecord {
            id: id.to_string(),
            user_agent: "Mozilla/5.0".into(),
            platform: "Linux".into(),
            login_ts: last_active_ts,
            last_active_ts,
        }
    }

    fn ids(devices: &[DeviceRecord]) -> Vec<&str> {
        devices.iter().map(|d| d.id.as_str()).collect()
    }

    fn registry() -> DeviceRegistry {
        DeviceRegistry::new(Arc::new(MemoryStore::new()), 2, Duration::hours(24))
    }

    #[test]
    fn truncation_keeps_most_recent_entries() {
        for existing in 0..6 {
            let devices: Vec<_> = (0..existing)
                .map(|i| device(&format!("d{i}"), NOW - i as i64))
                .collect();
            let out = prune_and_append(devices, device("new", NOW), NOW, Duration::hours(24), 2);

            assert_eq!(out.len(), (existing + 1).min(2));
            assert_eq!(out.last().unwrap().id, "new");
            if existing >= 1 {
                assert_eq!(out[out.len() - 2].id, format!("d{}", existing - 1));
            }
        }
    }

    #[test]
    fn stale_records_are_pruned_on_append() {
        let devices = vec![
            device("old", NOW - 24 * HOUR),
            device("older", NOW - 48 * HOUR),
            device("fresh", NOW - 23 * HOUR),
        ];
        let out = prune_and_append(devices, device("new", NOW), NOW, Duration::hours(24), 5);
        assert_eq!(ids(&out), vec!["fresh", "new"]);
    }

    #[test]
    fn capacity_ignores_stale_devices() {
        let reg = registry();
        write_json(
            reg.store.as_ref(),
            DEVICES_KEY,
            &vec![device("a", NOW - 30 * HOUR), device("b", NOW - HOUR)],
        )
        .unwrap();

        assert_eq!(reg.count(), 2);
        assert_eq!(ids(&reg.active(NOW)), vec!["b"]);
        assert!(reg.has_capacity(NOW));
        // Peeking does not rewrite storage.
        assert_eq!(reg.count(), 2);
    }

    #[test]
    fn register_persists_pruned_list() {
        let reg = registry();
        reg.register(device("a", NOW - 30 * HOUR), NOW - 30 * HOUR)
            .unwrap();
        reg.register(device("b", NOW - HOUR), NOW - HOUR).unwrap();
        let out = reg.register(device("c", NOW), NOW).unwrap();

        assert_eq!(ids(&out), vec!["b", "c"]);
        assert_eq!(ids(&reg.list()), vec!["b", "c"]);
    }

    #[test]
    fn reregistering_same_id_does_not_duplicate() {
        let reg = registry();
        reg.register(device("a", NOW - HOUR), NOW - HOUR).unwrap();
        reg.register(device("b", NOW - HOUR), NOW - HOUR).unwrap();
        let out = reg.register(device("a", NOW), NOW).unwrap();
        assert_eq!(ids(&out), vec!["b", "a"]);
    }

    #[test]
    fn touch_remove_clear() {
        let reg = registry();
        reg.register(device("a", NOW - HOUR), NOW - HOUR).unwrap();

        assert!(reg.touch("a", NOW).unwrap());
        assert_eq!(reg.get("a").unwrap().last_active_ts, NOW);
        assert!(!reg.touch("missing", NOW).unwrap());

        assert!(!reg.remove("missing").unwrap());
        assert!(reg.remove("a").unwrap());
        assert_eq!(reg.count(), 0);

        reg.register(device("b", NOW), NOW).unwrap();
        reg.clear().unwrap();
        assert!(reg.list().is_empty());
    }

    #[test]
    fn malformed_registry_reads_as_empty() {
        let reg = registry();
        reg.store.set(DEVICES_KEY, "[{\"id\":").unwrap();
        assert!(reg.list().is_empty());
        assert!(reg.has_capacity(NOW));
    }
}
