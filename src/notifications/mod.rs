use std::sync::Arc;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::model::notification::Notification;
use crate::storage::{read_json_or_default, write_json, KeyValueStore, NOTIFICATIONS_KEY};

const SIMULATED_MESSAGES: [&str; 4] = [
    "New high-value order placed",
    "System backup completed",
    "Seller performance report ready",
    "Monthly revenue target achieved",
];

/// Newest-first notification list under `ceo_notifications`. Not capped.
#[derive(Clone)]
pub struct NotificationCenter {
    store: Arc<dyn KeyValueStore>,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Notification> {
        read_json_or_default(self.store.as_ref(), NOTIFICATIONS_KEY)
    }

    pub fn unread_count(&self) -> usize {
        self.list().iter().filter(|n| !n.read).count()
    }

    pub fn push(&self, message: &str, now_ms: i64) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            ts: now_ms,
            read: false,
        };

        let mut all = self.list();
        all.insert(0, notification.clone());
        write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &all)?;
        debug!(message, "notification added");
        Ok(notification)
    }

    /// One simulated notification from the fixed pool.
    pub fn push_simulated<R: Rng + ?Sized>(&self, rng: &mut R, now_ms: i64) -> Result<Notification> {
        let message = SIMULATED_MESSAGES
            .choose(rng)
            .copied()
            .unwrap_or(SIMULATED_MESSAGES[0]);
        self.push(message, now_ms)
    }

    pub fn mark_read(&self, id: &str) -> Result<bool> {
        let mut all = self.list();
        let Some(item) = all.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        item.read = true;
        write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &all)?;
        Ok(true)
    }

    pub fn mark_all_read(&self) -> Result<usize> {
        let mut all = self.list();
        let mut changed = 0;
        for item in all.iter_mut().filter(|n| !n.read) {
            item.read = true;
            changed += 1;
        }
        if changed > 0 {
            write_json(self.store.as_ref(), NOTIFICATIONS_KEY, &all)?;
        }
        Ok(changed)
    }
}
