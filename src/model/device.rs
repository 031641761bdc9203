use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceRecord {
    pub id: String,         // device_<digest>
    pub user_agent: String, // as reported by the client
    pub platform: String,
    pub login_ts: i64,       // ms since epoch
    pub last_active_ts: i64, // ms since epoch
}

/// What a client tells us about itself when logging in.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: String,
    pub platform: String,
    /// Previously issued device id the client wants to keep using.
    pub device_id: Option<String>,
}
