use std::collections::VecDeque;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{AuthError, PasskeyGate, SessionCipher};
use crate::config::{Config, DEFAULT_CEO_NAME};
use crate::dashboard::incidents::Fluctuation;
use crate::dashboard::{check_services, ApplicationQueue, ExecutiveRole, IncidentTracker};
use crate::metrics::{FinancialReport, LiveMetrics};
use crate::model::device::{ClientInfo, DeviceRecord};
use crate::model::incident::Severity;
use crate::model::security_log::SecurityLogEntry;
use crate::model::session::Session;
use crate::model::toast::Toast;
use crate::model::website::HomepageContent;
use crate::notifications::NotificationCenter;
use crate::registry::DeviceRegistry;
use crate::security_log::SecurityLog;
use crate::session::{SessionCheck, SessionManager};
use crate::storage::{read_json_or_default, write_json, Storage, CEO_NAME_KEY, HOMEPAGE_KEY};

/// Toasts raised by background ticks wait here until a client polls.
const PENDING_TOAST_CAP: usize = 20;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// "Just now", "5m ago", "3h ago", or the calendar date.
pub fn format_relative(ts_ms: i64, now_ms: i64) -> String {
    let diff = now_ms - ts_ms;
    let mins = diff / 60_000;
    let hours = diff / 3_600_000;

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        DateTime::<Utc>::from_timestamp_millis(ts_ms)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub record: DeviceRecord,
    pub current: bool,
    pub last_active: String,
    pub logged_in: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceOverview {
    pub count: usize,
    pub max: usize,
    pub label: String,
    pub devices: Vec<DeviceView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginReceipt {
    pub session: Session,
    pub toast: Toast,
}

/// The whole dashboard state for one console. Callers hold it behind a
/// single lock; nothing in here is shared across threads.
pub struct CeoConsole {
    storage: Storage,
    sessions: SessionManager,
    security_log: SecurityLog,
    notifications: NotificationCenter,
    sellers: ApplicationQueue,
    incidents: IncidentTracker,
    metrics: Option<LiveMetrics>,
    pending_toasts: VecDeque<Toast>,
    /// Id of the session the last timeout cleared, so its holder is told
    /// why it was signed out.
    expired_session: Option<String>,
    rng: StdRng,
}

impl CeoConsole {
    pub fn new(config: &Config, storage: Storage) -> Result<Self> {
        let registry = DeviceRegistry::new(
            storage.local().clone(),
            config.max_devices,
            config.device_stale_after,
        );
        let sessions = SessionManager::new(
            storage.clone(),
            PasskeyGate::new(&config.passkey)?,
            SessionCipher::new(config.passkey.clone()),
            registry,
            config.session_timeout,
        );

        Ok(Self {
            security_log: SecurityLog::new(storage.local().clone(), config.security_log_cap),
            notifications: NotificationCenter::new(storage.local().clone()),
            storage,
            sessions,
            sellers: ApplicationQueue::seeded(),
            incidents: IncidentTracker::seeded(),
            metrics: None,
            pending_toasts: VecDeque::new(),
            expired_session: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Deterministic randomness, for tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ------------------------------------------------------------
    // SESSION
    // ------------------------------------------------------------
    pub fn session(&self) -> &Session {
        self.sessions.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    /// Startup: adopt a stored session if one is still valid.
    pub fn restore(&mut self, now_ms: i64) -> bool {
        match self.sessions.restore(now_ms) {
            Ok(true) => {
                self.refresh_metrics();
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(error = %e, "session restoration error");
                false
            }
        }
    }

    pub fn login(
        &mut self,
        passkey: &str,
        remember_device: bool,
        client: &ClientInfo,
        now_ms: i64,
    ) -> Result<LoginReceipt, AuthError> {
        let displaced = self.sessions.current().clone();
        let session = self
            .sessions
            .login(passkey, remember_device, client, now_ms, &mut self.rng)?
            .clone();

        if displaced.is_authenticated {
            self.audit_as(
                &displaced,
                "Session Replaced",
                "Session ended by a login from another device",
                now_ms,
            );
        }
        self.pending_toasts.clear();
        self.expired_session = None;
        self.refresh_metrics();
        self.audit("CEO Login", "Successful login to CEO Dashboard", now_ms);

        Ok(LoginReceipt {
            session,
            toast: Toast::success("Welcome to CEO Dashboard!"),
        })
    }

    pub fn logout(&mut self, now_ms: i64) -> Result<Toast, AuthError> {
        let previous = self.sessions.logout()?;
        self.metrics = None;
        self.audit_as(
            &previous,
            "CEO Logout",
            "User logged out from CEO Dashboard",
            now_ms,
        );
        Ok(Toast::info("Logged out successfully."))
    }

    /// Gate for every privileged request: timeout check, session id match,
    /// then the request counts as activity.
    pub fn authorize(&mut self, presented: Option<&str>, now_ms: i64) -> Result<(), AuthError> {
        if let SessionCheck::Expired(previous) = self.sessions.check_timeout(now_ms)? {
            self.on_expired(&previous, now_ms);
            if presented.is_some() && presented == previous.session_id.as_deref() {
                self.expired_session = None;
                return Err(AuthError::SessionExpired);
            }
            return Err(AuthError::NotAuthenticated);
        }

        let current = self.sessions.current();
        if !current.is_authenticated {
            if presented.is_some() && presented == self.expired_session.as_deref() {
                self.expired_session = None;
                return Err(AuthError::SessionExpired);
            }
            return Err(AuthError::NotAuthenticated);
        }
        match (presented, current.session_id.as_deref()) {
            (Some(presented), Some(expected)) if presented == expected => {}
            _ => return Err(AuthError::NotAuthenticated),
        }

        self.sessions.touch(now_ms)
    }

    /// Periodic timeout check. Returns true when the session was cleared.
    pub fn enforce_timeout(&mut self, now_ms: i64) -> bool {
        match self.sessions.check_timeout(now_ms) {
            Ok(SessionCheck::Expired(previous)) => {
                self.on_expired(&previous, now_ms);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(error = %e, "session timeout check failed");
                false
            }
        }
    }

    fn on_expired(&mut self, previous: &Session, now_ms: i64) {
        self.metrics = None;
        self.expired_session = previous.session_id.clone();
        self.audit_as(
            previous,
            "CEO Logout",
            "Session expired due to inactivity",
            now_ms,
        );
    }

    // ------------------------------------------------------------
    // LIVE DATA
    // ------------------------------------------------------------
    pub fn metrics(&self) -> Option<&LiveMetrics> {
        self.metrics.as_ref()
    }

    pub fn refresh_metrics(&mut self) -> &LiveMetrics {
        self.metrics.insert(LiveMetrics::sample(&mut self.rng))
    }

    /// Live-update tick: new metrics, maybe a notification, a health check.
    pub fn live_tick(&mut self, now_ms: i64) {
        if !self.is_authenticated() {
            return;
        }
        self.refresh_metrics();

        if self.rng.gen_bool(0.2) {
            if let Err(e) = self.notifications.push_simulated(&mut self.rng, now_ms) {
                warn!(error = %e, "failed to store notification");
            }
        }

        let health = check_services(&mut self.rng);
        if let Some(message) = health.alert_message() {
            self.push_toast(Toast::warning(message));
        }
    }

    /// Simulated-event tick: seller applications, incidents, notifications.
    pub fn simulate_events(&mut self, now_ms: i64) {
        if self.rng.gen_bool(0.3) {
            let app = self.sellers.add_random(&mut self.rng);
            self.push_toast(Toast::info(format!("New seller application: {}", app.name)));
            self.audit(
                "New Seller Application",
                &format!("{} applied as seller", app.name),
                now_ms,
            );
        }

        if self.rng.gen_bool(0.2) {
            if let Fluctuation::Added(incident) = self.incidents.fluctuate(&mut self.rng) {
                if incident.severity == Severity::Critical {
                    self.push_toast(Toast::error(format!("Critical Error: {}", incident.title)));
                    self.audit("System Error", &incident.title, now_ms);
                }
            }
        }

        if self.rng.gen_bool(0.1) {
            if let Err(e) = self.notifications.push_simulated(&mut self.rng, now_ms) {
                warn!(error = %e, "failed to store notification");
            }
        }
    }

    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        self.pending_toasts.drain(..).collect()
    }

    fn push_toast(&mut self, toast: Toast) {
        info!(kind = ?toast.kind, message = %toast.message, "toast");
        if self.pending_toasts.len() == PENDING_TOAST_CAP {
            self.pending_toasts.pop_front();
        }
        self.pending_toasts.push_back(toast);
    }

    // ------------------------------------------------------------
    // DEVICES
    // ------------------------------------------------------------
    pub fn devices(&self, now_ms: i64) -> DeviceOverview {
        let registry = self.sessions.registry();
        let current = self.session().device_id.as_deref();
        let devices: Vec<DeviceView> = registry
            .list()
            .into_iter()
            .map(|record| DeviceView {
                current: Some(record.id.as_str()) == current,
                last_active: format_relative(record.last_active_ts, now_ms),
                logged_in: format_relative(record.login_ts, now_ms),
                record,
            })
            .collect();

        DeviceOverview {
            count: devices.len(),
            max: registry.max_devices(),
            label: format!("{}/{}", devices.len(), registry.max_devices()),
            devices,
        }
    }

    pub fn remove_device(&mut self, id: &str, now_ms: i64) -> Result<Toast> {
        if self.session().device_id.as_deref() == Some(id) {
            return Ok(Toast::warning(
                "Cannot remove current device. Please logout first.",
            ));
        }
        if !self.sessions.registry().remove(id)? {
            return Ok(Toast::warning("Device not found."));
        }

        let short: String = id.chars().take(8).collect();
        self.audit(
            "Device Removed",
            &format!("Device {short}... removed by CEO"),
            now_ms,
        );
        Ok(Toast::success("Device removed successfully!"))
    }

    /// Forget every device, then end the current session too.
    pub fn remove_all_devices(&mut self, now_ms: i64) -> Result<Toast> {
        self.sessions.registry().clear()?;
        self.audit("All Devices Removed", "CEO removed all active devices", now_ms);
        self.logout(now_ms)?;
        Ok(Toast::success("All devices removed!"))
    }

    // ------------------------------------------------------------
    // LOGS & NOTIFICATIONS
    // ------------------------------------------------------------
    pub fn security_logs(&self, limit: usize) -> Vec<SecurityLogEntry> {
        self.security_log.recent(limit)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    fn audit(&self, action: &str, details: &str, now_ms: i64) {
        self.audit_as(self.sessions.current(), action, details, now_ms);
    }

    fn audit_as(&self, session: &Session, action: &str, details: &str, now_ms: i64) {
        if let Err(e) = self.security_log.record(action, details, session, now_ms) {
            warn!(action, error = %e, "failed to write security log");
        }
    }

    // ------------------------------------------------------------
    // SELLERS, INCIDENTS, FINANCE, EXECUTIVES
    // ------------------------------------------------------------
    pub fn sellers(&self) -> &ApplicationQueue {
        &self.sellers
    }

    pub fn approve_seller(&mut self, id: &str, now_ms: i64) -> Toast {
        match self.sellers.approve(id, &mut self.rng) {
            Some(_) => {
                self.audit(
                    "Seller Approved",
                    &format!("Application {id} approved by CEO"),
                    now_ms,
                );
                Toast::success("Seller application approved successfully!")
            }
            None => Toast::warning("Application not found or already decided."),
        }
    }

    pub fn reject_seller(&mut self, id: &str, now_ms: i64) -> Toast {
        match self.sellers.reject(id) {
            Some(_) => {
                self.audit(
                    "Seller Rejected",
                    &format!("Application {id} rejected by CEO"),
                    now_ms,
                );
                Toast::warning("Seller application rejected.")
            }
            None => Toast::warning("Application not found or already decided."),
        }
    }

    pub fn view_seller_dashboard(&mut self, seller: &str, now_ms: i64) -> Toast {
        self.audit(
            "Seller Dashboard Access",
            &format!("CEO accessed {seller} dashboard"),
            now_ms,
        );
        Toast::info(format!("Opening seller dashboard: {seller}..."))
    }

    pub fn incidents(&self) -> &IncidentTracker {
        &self.incidents
    }

    pub fn resolve_incident(&mut self, id: &str) -> Toast {
        match self.incidents.resolve(id) {
            Some(_) => Toast::success("Error marked as resolved."),
            None => Toast::warning("Error not found or already resolved."),
        }
    }

    pub fn run_financial_calculation(&mut self, now_ms: i64) -> (FinancialReport, Toast) {
        let report = FinancialReport::calculate(&mut self.rng);
        self.audit("Financial Calculation", "CEO ran financial analysis", now_ms);
        (report, Toast::success("Financial calculation completed!"))
    }

    pub fn open_executive_dashboard(&mut self, role: ExecutiveRole, now_ms: i64) -> Toast {
        let title = role.title();
        self.audit("Executive Access", &format!("CEO accessed {title}"), now_ms);
        Toast::info(format!("Accessing {title}..."))
    }

    // ------------------------------------------------------------
    // WEBSITE EDITOR
    // ------------------------------------------------------------
    pub fn homepage(&self) -> HomepageContent {
        read_json_or_default(self.storage.local().as_ref(), HOMEPAGE_KEY)
    }

    pub fn update_homepage(&mut self, heading: &str, tagline: &str, now_ms: i64) -> Result<Toast> {
        let heading = heading.trim();
        if heading.is_empty() {
            return Ok(Toast::warning("Homepage heading cannot be empty."));
        }

        let content = HomepageContent {
            heading: heading.to_string(),
            tagline: tagline.trim().to_string(),
            updated_ts: Some(now_ms),
        };
        write_json(self.storage.local().as_ref(), HOMEPAGE_KEY, &content)?;
        self.audit("Website Edit", "CEO updated homepage content", now_ms);
        Ok(Toast::success("Homepage updated successfully!"))
    }

    // ------------------------------------------------------------
    // PROFILE
    // ------------------------------------------------------------
    pub fn ceo_name(&self) -> String {
        match self.storage.local().get(CEO_NAME_KEY) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => DEFAULT_CEO_NAME.to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read ceo name");
                DEFAULT_CEO_NAME.to_string()
            }
        }
    }

    pub fn set_ceo_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            self.storage.local().remove(CEO_NAME_KEY)
        } else {
            self.storage.local().set(CEO_NAME_KEY, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::toast::ToastKind;

    const PASSKEY: &str = "VICTORY2024CEO";
    const HOUR: i64 = 3_600_000;
    const NOW: i64 = 1_700_000_000_000;

    fn console() -> CeoConsole {
        CeoConsole::new(&Config::default(), Storage::in_memory())
            .unwrap()
            .with_seed(17)
    }

    fn client(ua: &str) -> ClientInfo {
        ClientInfo {
            user_agent: ua.to_string(),
            platform: "MacIntel".to_string(),
            device_id: None,
        }
    }

    fn session_id(c: &CeoConsole) -> String {
        c.session().session_id.clone().unwrap()
    }

    #[test]
    fn relative_labels() {
        assert_eq!(format_relative(NOW, NOW), "Just now");
        assert_eq!(format_relative(NOW - 59_999, NOW), "Just now");
        assert_eq!(format_relative(NOW - 5 * 60_000, NOW), "5m ago");
        assert_eq!(format_relative(NOW - 3 * HOUR, NOW), "3h ago");
        assert_eq!(format_relative(NOW - 48 * HOUR, NOW), "2023-11-12");
    }

    #[test]
    fn login_logs_and_starts_metrics() {
        let mut c = console();
        let receipt = c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        assert_eq!(receipt.toast.kind, ToastKind::Success);
        assert!(c.metrics().is_some());

        let logs = c.security_logs(5);
        assert_eq!(logs[0].action, "CEO Login");
        assert_eq!(logs[0].session_id, receipt.session.session_id);
    }

    #[test]
    fn logout_logs_with_previous_identity() {
        let mut c = console();
        c.login(PASSKEY, true, &client("ua"), NOW).unwrap();
        let sid = session_id(&c);

        let toast = c.logout(NOW + 1).unwrap();
        assert_eq!(toast.message, "Logged out successfully.");
        assert!(c.metrics().is_none());

        let logs = c.security_logs(1);
        assert_eq!(logs[0].action, "CEO Logout");
        assert_eq!(logs[0].session_id.as_deref(), Some(sid.as_str()));
    }

    #[test]
    fn authorize_requires_matching_session_and_refreshes_activity() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let sid = session_id(&c);

        assert!(matches!(
            c.authorize(None, NOW + 1),
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(
            c.authorize(Some("ceo_0_wrong"), NOW + 1),
            Err(AuthError::NotAuthenticated)
        ));

        c.authorize(Some(&sid), NOW + 30 * 60_000).unwrap();
        assert_eq!(c.session().last_activity_ts, Some(NOW + 30 * 60_000));

        // 61 minutes after login, but only 31 after the last request
        c.authorize(Some(&sid), NOW + 61 * 60_000).unwrap();
    }

    #[test]
    fn authorize_after_timeout_expires_session() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let sid = session_id(&c);

        assert!(matches!(
            c.authorize(Some(&sid), NOW + HOUR + 1),
            Err(AuthError::SessionExpired)
        ));
        assert!(!c.is_authenticated());
        assert_eq!(c.security_logs(1)[0].details, "Session expired due to inactivity");
        assert!(c.drain_toasts().is_empty());
        // the expiry was already reported on this request
        assert!(matches!(
            c.authorize(Some(&sid), NOW + HOUR + 2),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn timeout_seen_by_a_stranger_is_kept_for_the_holder() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let sid = session_id(&c);

        assert!(matches!(
            c.authorize(None, NOW + HOUR + 1),
            Err(AuthError::NotAuthenticated)
        ));
        assert!(!c.is_authenticated());
        assert!(matches!(
            c.authorize(Some(&sid), NOW + HOUR + 2),
            Err(AuthError::SessionExpired)
        ));
    }

    #[test]
    fn sweeper_expiry_is_reported_to_its_holder_only() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let sid = session_id(&c);

        assert!(c.enforce_timeout(NOW + HOUR + 1));
        assert!(c.drain_toasts().is_empty());

        assert!(matches!(
            c.authorize(Some("ceo_0_someoneelse"), NOW + HOUR + 2),
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(
            c.authorize(Some(&sid), NOW + HOUR + 3),
            Err(AuthError::SessionExpired)
        ));
        assert!(matches!(
            c.authorize(Some(&sid), NOW + HOUR + 4),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn next_login_starts_without_stale_toasts() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let stale = session_id(&c);
        for i in 0..50 {
            c.live_tick(NOW + i);
            c.simulate_events(NOW + i);
        }
        assert!(c.enforce_timeout(NOW + 2 * HOUR));

        c.login(PASSKEY, false, &client("ua"), NOW + 2 * HOUR + 1)
            .unwrap();
        assert!(c.drain_toasts().is_empty());
        assert!(matches!(
            c.authorize(Some(&stale), NOW + 2 * HOUR + 2),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn login_over_active_session_is_audited() {
        let mut c = console();
        c.login(PASSKEY, true, &client("laptop"), NOW).unwrap();
        let first = session_id(&c);
        c.login(PASSKEY, true, &client("phone"), NOW + 1).unwrap();

        let logs = c.security_logs(2);
        assert_eq!(logs[0].action, "CEO Login");
        assert_eq!(logs[1].action, "Session Replaced");
        assert_eq!(logs[1].session_id.as_deref(), Some(first.as_str()));
        assert_eq!(c.devices(NOW + 1).count, 2);

        let err = c
            .login(PASSKEY, true, &client("tablet"), NOW + 2)
            .unwrap_err();
        assert!(matches!(err, AuthError::DeviceLimit { max: 2 }));
    }

    #[test]
    fn homepage_edits_persist_and_are_audited() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        assert_eq!(
            c.homepage().heading,
            "Victory Bazaar - Premium Shopping Experience"
        );
        assert_eq!(c.homepage().updated_ts, None);

        let toast = c
            .update_homepage(" Festive Sale ", "Up to 50% off", NOW + 5)
            .unwrap();
        assert_eq!(toast.message, "Homepage updated successfully!");
        let home = c.homepage();
        assert_eq!(home.heading, "Festive Sale");
        assert_eq!(home.tagline, "Up to 50% off");
        assert_eq!(home.updated_ts, Some(NOW + 5));
        assert_eq!(c.security_logs(1)[0].action, "Website Edit");
        assert_eq!(c.security_logs(1)[0].details, "CEO updated homepage content");

        let toast = c.update_homepage("  ", "ignored", NOW + 6).unwrap();
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(c.homepage().heading, "Festive Sale");
    }

    #[test]
    fn enforce_timeout_only_fires_once() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        assert!(!c.enforce_timeout(NOW + HOUR));
        assert!(c.enforce_timeout(NOW + HOUR + 1));
        assert!(!c.enforce_timeout(NOW + 2 * HOUR));
    }

    #[test]
    fn current_device_cannot_be_removed() {
        let mut c = console();
        c.login(PASSKEY, true, &client("first"), NOW).unwrap();
        let current = c.session().device_id.clone().unwrap();

        let toast = c.remove_device(&current, NOW).unwrap();
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(c.devices(NOW).count, 1);

        let overview = c.devices(NOW);
        assert_eq!(overview.label, "1/2");
        assert!(overview.devices[0].current);
        assert_eq!(overview.devices[0].last_active, "Just now");
    }

    #[test]
    fn other_devices_can_be_removed() {
        let storage = Storage::in_memory();
        let mut first = CeoConsole::new(&Config::default(), storage.clone())
            .unwrap()
            .with_seed(1);
        first.login(PASSKEY, true, &client("first"), NOW).unwrap();
        let first_device = first.session().device_id.clone().unwrap();

        let mut second = CeoConsole::new(&Config::default(), storage)
            .unwrap()
            .with_seed(2);
        second
            .login(PASSKEY, false, &client("second"), NOW + 1)
            .unwrap();
        assert_eq!(second.devices(NOW + 1).count, 2);

        let toast = second.remove_device(&first_device, NOW + 2).unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(second.devices(NOW + 2).count, 1);
        assert_eq!(second.security_logs(1)[0].action, "Device Removed");
    }

    #[test]
    fn remove_all_devices_logs_out() {
        let mut c = console();
        c.login(PASSKEY, true, &client("ua"), NOW).unwrap();
        c.remove_all_devices(NOW + 1).unwrap();

        assert!(!c.is_authenticated());
        assert_eq!(c.devices(NOW + 1).count, 0);
        let actions: Vec<String> = c.security_logs(2).into_iter().map(|l| l.action).collect();
        assert_eq!(actions, vec!["CEO Logout", "All Devices Removed"]);
    }

    #[test]
    fn seller_decisions_are_logged() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();

        assert_eq!(c.approve_seller("1", NOW).kind, ToastKind::Success);
        assert_eq!(c.security_logs(1)[0].details, "Application 1 approved by CEO");
        assert_eq!(c.reject_seller("2", NOW).message, "Seller application rejected.");
        assert_eq!(c.sellers().pending_count(), 2);
        assert_eq!(
            c.approve_seller("1", NOW).message,
            "Application not found or already decided."
        );
        assert_eq!(c.sellers().active_sellers().len(), 1);
    }

    #[test]
    fn live_tick_is_idle_without_session() {
        let mut c = console();
        c.live_tick(NOW);
        assert!(c.metrics().is_none());

        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();
        let before = c.metrics().cloned();
        for i in 0..20 {
            c.live_tick(NOW + i);
        }
        assert!(c.metrics().is_some());
        assert_ne!(c.metrics().cloned(), before);
    }

    #[test]
    fn simulated_events_grow_queues() {
        let mut c = console();
        for i in 0..200 {
            c.simulate_events(NOW + i);
        }
        assert!(c.sellers().pending_count() > 4);
        assert!(!c.notifications().list().is_empty());
        assert!(c.drain_toasts().len() <= PENDING_TOAST_CAP);
    }

    #[test]
    fn finance_and_executive_access_are_audited() {
        let mut c = console();
        c.login(PASSKEY, false, &client("ua"), NOW).unwrap();

        let (report, _) = c.run_financial_calculation(NOW);
        assert_eq!(report.net, report.profit - report.commission);
        assert_eq!(c.security_logs(1)[0].action, "Financial Calculation");

        let toast = c.open_executive_dashboard(ExecutiveRole::Coo, NOW);
        assert_eq!(toast.message, "Accessing COO Dashboard...");
        assert_eq!(c.security_logs(1)[0].details, "CEO accessed COO Dashboard");
    }

    #[test]
    fn ceo_name_defaults_and_persists() {
        let mut c = console();
        assert_eq!(c.ceo_name(), "Chief Executive Officer");
        c.set_ceo_name("  Asha Rao ").unwrap();
        assert_eq!(c.ceo_name(), "Asha Rao");
        c.set_ceo_name("").unwrap();
        assert_eq!(c.ceo_name(), "Chief Executive Officer");
    }

    #[test]
    fn restore_picks_up_remembered_session() {
        let storage = Storage::in_memory();
        let sid = {
            let mut c = CeoConsole::new(&Config::default(), storage.clone()).unwrap();
            c.login(PASSKEY, true, &client("ua"), NOW).unwrap();
            session_id(&c)
        };

        let mut c = CeoConsole::new(&Config::default(), storage).unwrap();
        assert!(c.restore(NOW + 60_000));
        assert_eq!(session_id(&c), sid);
        assert!(c.metrics().is_some());
    }
}
