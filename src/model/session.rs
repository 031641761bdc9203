use serde::{Deserialize, Serialize};

pub const FULL_ACCESS: &str = "full_access";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub session_id: Option<String>,
    pub device_id: Option<String>,
    pub login_ts: Option<i64>,
    pub last_activity_ts: Option<i64>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_authenticated && self.permissions.iter().any(|p| p == permission)
    }

    /// Idle time in ms, or `None` when no activity was ever recorded.
    pub fn idle_ms(&self, now_ms: i64) -> Option<i64> {
        self.last_activity_ts.map(|last| now_ms - last)
    }
}
