use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::model::{security_log::SecurityLogEntry, session::Session};
use crate::storage::{read_json_or_default, write_json, KeyValueStore, SECURITY_LOGS_KEY};

/// Newest-first, capped list of console actions for on-screen review.
#[derive(Clone)]
pub struct SecurityLog {
    store: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl SecurityLog {
    pub fn new(store: Arc<dyn KeyValueStore>, cap: usize) -> Self {
        Self { store, cap }
    }

    pub fn record(
        &self,
        action: &str,
        details: &str,
        session: &Session,
        now_ms: i64,
    ) -> Result<SecurityLogEntry> {
        let entry = SecurityLogEntry {
            ts: now_ms,
            action: action.to_string(),
            details: details.to_string(),
            session_id: session.session_id.clone(),
            device_id: session.device_id.clone(),
        };

        let mut logs = self.all();
        logs.insert(0, entry.clone());
        logs.truncate(self.cap);
        write_json(self.store.as_ref(), SECURITY_LOGS_KEY, &logs)?;

        info!(target: "security", action, details, "security event");
        Ok(entry)
    }

    pub fn all(&self) -> Vec<SecurityLogEntry> {
        read_json_or_default(self.store.as_ref(), SECURITY_LOGS_KEY)
    }

    pub fn recent(&self, limit: usize) -> Vec<SecurityLogEntry> {
        let mut logs = self.all();
        logs.truncate(limit);
        logs
    }
}
