use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::{FinancialReport, LiveMetrics};
use crate::model::incident::Incident;
use crate::model::notification::Notification;
use crate::model::seller::{ActiveSeller, SellerApplication};
use crate::model::session::Session;
use crate::model::toast::Toast;
use crate::model::website::HomepageContent;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub passkey: String,
    #[serde(default)]
    pub remember_device: bool,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session: Session,
    pub toast: Toast,
}

/// Session status without the session id.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub device_id: Option<String>,
    pub login_ts: Option<i64>,
    pub last_activity_ts: Option<i64>,
    pub ceo_name: String,
}

impl SessionStatus {
    pub fn new(session: &Session, ceo_name: String) -> Self {
        Self {
            authenticated: session.is_authenticated,
            device_id: session.device_id.clone(),
            login_ts: session.login_ts,
            last_activity_ts: session.last_activity_ts,
            ceo_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: usize,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub metrics: LiveMetrics,
    pub display: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
pub struct SellersResponse {
    pub pending: usize,
    pub applications: Vec<SellerApplication>,
    pub active: Vec<ActiveSeller>,
}

#[derive(Debug, Deserialize)]
pub struct SellerDashboardRequest {
    pub seller: String,
}

#[derive(Debug, Serialize)]
pub struct IncidentsResponse {
    pub open: usize,
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Serialize)]
pub struct FinanceResponse {
    pub report: FinancialReport,
    pub display: BTreeMap<&'static str, String>,
    pub toast: Toast,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct HomepageRequest {
    pub heading: String,
    #[serde(default)]
    pub tagline: String,
}

#[derive(Debug, Serialize)]
pub struct HomepageResponse {
    pub homepage: HomepageContent,
    pub toast: Toast,
}

#[derive(Debug, Serialize)]
pub struct ToastsResponse {
    pub toasts: Vec<Toast>,
}
