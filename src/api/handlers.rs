use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::{
    api::auth::ApiError,
    api::types::{
        FinanceResponse, HomepageRequest, HomepageResponse, IncidentsResponse, LimitQuery,
        LoginRequest, LoginResponse, MarkedRead, MetricsResponse, NotificationsResponse, Profile,
        SellerDashboardRequest, SellersResponse, SessionStatus, ToastsResponse,
    },
    console::{now_ms, DeviceOverview},
    dashboard::ExecutiveRole,
    model::device::ClientInfo,
    model::security_log::SecurityLogEntry,
    model::toast::{Toast, ToastKind},
    model::website::HomepageContent,
    state::AppState,
};

const DEFAULT_LOG_LIMIT: usize = 10;

// ------------------------------------------------------------
// SESSION
// ------------------------------------------------------------
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let client = ClientInfo {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string(),
        platform: req.platform,
        device_id: req.device_id,
    };

    let receipt = state
        .console
        .lock()
        .await
        .login(&req.passkey, req.remember_device, &client, now_ms())?;

    state.start_live_updates().await;

    Ok(Json(LoginResponse {
        session: receipt.session,
        toast: receipt.toast,
    }))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<Toast>, ApiError> {
    let toast = state.console.lock().await.logout(now_ms())?;
    state.stop_live_updates().await;
    Ok(Json(toast))
}

pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    let (expired, status) = {
        let mut console = state.console.lock().await;
        let expired = console.enforce_timeout(now_ms());
        (expired, SessionStatus::new(console.session(), console.ceo_name()))
    };
    if expired {
        state.stop_live_updates().await;
    }
    Json(status)
}

/// The session layer already recorded the activity.
pub async fn activity() -> StatusCode {
    StatusCode::NO_CONTENT
}

// ------------------------------------------------------------
// DEVICES
// ------------------------------------------------------------
pub async fn list_devices(State(state): State<AppState>) -> Json<DeviceOverview> {
    Json(state.console.lock().await.devices(now_ms()))
}

pub async fn remove_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Toast>, ApiError> {
    let toast = state
        .console
        .lock()
        .await
        .remove_device(&device_id, now_ms())?;
    Ok(Json(toast))
}

pub async fn remove_all_devices(State(state): State<AppState>) -> Result<Json<Toast>, ApiError> {
    let toast = state.console.lock().await.remove_all_devices(now_ms())?;
    state.stop_live_updates().await;
    Ok(Json(toast))
}

// ------------------------------------------------------------
// LOGS & NOTIFICATIONS
// ------------------------------------------------------------
pub async fn security_logs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<SecurityLogEntry>> {
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    Json(state.console.lock().await.security_logs(limit))
}

pub async fn list_notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let console = state.console.lock().await;
    let notifications = console.notifications().list();
    Json(NotificationsResponse {
        unread: notifications.iter().filter(|n| !n.read).count(),
        notifications,
    })
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.console.lock().await.notifications().mark_read(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Notification not found."))
    }
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
) -> Result<Json<MarkedRead>, ApiError> {
    let marked = state.console.lock().await.notifications().mark_all_read()?;
    Ok(Json(MarkedRead { marked }))
}

pub async fn drain_toasts(State(state): State<AppState>) -> Json<ToastsResponse> {
    Json(ToastsResponse {
        toasts: state.console.lock().await.drain_toasts(),
    })
}

// ------------------------------------------------------------
// METRICS & FINANCE
// ------------------------------------------------------------
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let mut console = state.console.lock().await;
    let metrics = match console.metrics().cloned() {
        Some(m) => m,
        None => console.refresh_metrics().clone(),
    };
    Json(MetricsResponse {
        display: metrics.display(),
        metrics,
    })
}

pub async fn refresh_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let metrics = state.console.lock().await.refresh_metrics().clone();
    Json(MetricsResponse {
        display: metrics.display(),
        metrics,
    })
}

pub async fn calculate_finance(State(state): State<AppState>) -> Json<FinanceResponse> {
    let (report, toast) = state
        .console
        .lock()
        .await
        .run_financial_calculation(now_ms());
    Json(FinanceResponse {
        display: report.display(),
        report,
        toast,
    })
}

// ------------------------------------------------------------
// SELLERS & INCIDENTS
// ------------------------------------------------------------
pub async fn list_sellers(State(state): State<AppState>) -> Json<SellersResponse> {
    let console = state.console.lock().await;
    let queue = console.sellers();
    Json(SellersResponse {
        pending: queue.pending_count(),
        applications: queue.applications().to_vec(),
        active: queue.active_sellers().to_vec(),
    })
}

pub async fn approve_seller(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Toast> {
    Json(state.console.lock().await.approve_seller(&id, now_ms()))
}

pub async fn reject_seller(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Toast> {
    Json(state.console.lock().await.reject_seller(&id, now_ms()))
}

pub async fn seller_dashboard(
    State(state): State<AppState>,
    Json(req): Json<SellerDashboardRequest>,
) -> Json<Toast> {
    Json(
        state
            .console
            .lock()
            .await
            .view_seller_dashboard(&req.seller, now_ms()),
    )
}

pub async fn list_incidents(State(state): State<AppState>) -> Json<IncidentsResponse> {
    let console = state.console.lock().await;
    let tracker = console.incidents();
    Json(IncidentsResponse {
        open: tracker.open_count(),
        incidents: tracker.all().to_vec(),
    })
}

pub async fn resolve_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Toast> {
    Json(state.console.lock().await.resolve_incident(&id))
}

// ------------------------------------------------------------
// EXECUTIVES & PROFILE
// ------------------------------------------------------------
pub async fn executive_access(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Toast>, ApiError> {
    let role = ExecutiveRole::parse(&role)
        .ok_or_else(|| ApiError::not_found("Unknown executive dashboard."))?;
    Ok(Json(
        state
            .console
            .lock()
            .await
            .open_executive_dashboard(role, now_ms()),
    ))
}

pub async fn get_homepage(State(state): State<AppState>) -> Json<HomepageContent> {
    Json(state.console.lock().await.homepage())
}

pub async fn update_homepage(
    State(state): State<AppState>,
    Json(req): Json<HomepageRequest>,
) -> Result<Json<HomepageResponse>, ApiError> {
    let mut console = state.console.lock().await;
    let toast = console.update_homepage(&req.heading, &req.tagline, now_ms())?;
    if toast.kind == ToastKind::Warning {
        return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, toast));
    }
    Ok(Json(HomepageResponse {
        homepage: console.homepage(),
        toast,
    }))
}

pub async fn get_profile(State(state): State<AppState>) -> Json<Profile> {
    Json(Profile {
        name: state.console.lock().await.ceo_name(),
    })
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<Profile>,
) -> Result<Json<Profile>, ApiError> {
    let mut console = state.console.lock().await;
    console.set_ceo_name(&req.name)?;
    Ok(Json(Profile {
        name: console.ceo_name(),
    }))
}
