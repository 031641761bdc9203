use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityLogEntry {
    pub ts: i64,
    pub action: String,
    pub details: String,
    pub session_id: Option<String>,
    pub device_id: Option<String>,
}
