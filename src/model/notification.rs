use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: String, // UUID
    pub message: String,
    pub ts: i64,
    #[serde(default)]
    pub read: bool,
}
