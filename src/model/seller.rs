use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerApplication {
    pub id: String,
    pub name: String,
    pub submitted: String, // display label, e.g. "Today, 10:30 AM"
    pub category: String,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSeller {
    pub name: String,
    pub sales: u64,
    pub commission: u64,
}
