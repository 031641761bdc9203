use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

pub mod memory;

pub use memory::MemoryStore;

pub const SESSION_KEY: &str = "ceo_session";
pub const DEVICES_KEY: &str = "ceo_active_devices";
pub const SECURITY_LOGS_KEY: &str = "ceo_security_logs";
pub const NOTIFICATIONS_KEY: &str = "ceo_notifications";
pub const CEO_NAME_KEY: &str = "ceo_name";
pub const HOMEPAGE_KEY: &str = "ceo_homepage";

/// String-valued key/value store. Access is synchronous; callers serialise
/// through the console lock.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageScope {
    /// Survives restarts.
    Local,
    /// Lives as long as the process.
    Session,
}

/// The two storage scopes a session can be written to.
#[derive(Clone)]
pub struct Storage {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn local(&self) -> &Arc<dyn KeyValueStore> {
        &self.local
    }

    pub fn session(&self) -> &Arc<dyn KeyValueStore> {
        &self.session
    }

    pub fn scope(&self, scope: StorageScope) -> &Arc<dyn KeyValueStore> {
        match scope {
            StorageScope::Local => &self.local,
            StorageScope::Session => &self.session,
        }
    }
}

/// Read a JSON value, falling back to `T::default()` when the key is absent,
/// unreadable or malformed.
pub fn read_json_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using default");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "malformed stored value, using default");
        T::default()
    })
}

pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).with_context(|| format!("Failed to encode {key}"))?;
    store
        .set(key, &raw)
        .with_context(|| format!("Failed to write {key}"))
}
