use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub mod auth;
pub mod handlers;
pub mod types;

use handlers::{
    activity, approve_seller, calculate_finance, drain_toasts, executive_access, get_homepage,
    get_metrics, get_profile, list_devices, list_incidents, list_notifications, list_sellers,
    login, logout, mark_all_notifications_read, mark_notification_read, refresh_metrics, reject_seller,
    remove_all_devices, remove_device, resolve_incident, security_logs, seller_dashboard,
    session_status, update_homepage, update_profile,
};

/// Console API. Only login and session status are reachable without a
/// session header.
pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/ceo/logout", post(logout))
        .route("/api/ceo/activity", post(activity))
        .route(
            "/api/ceo/devices",
            get(list_devices).delete(remove_all_devices),
        )
        .route("/api/ceo/devices/{id}", delete(remove_device))
        .route("/api/ceo/security-logs", get(security_logs))
        .route("/api/ceo/notifications", get(list_notifications))
        .route(
            "/api/ceo/notifications/read-all",
            post(mark_all_notifications_read),
        )
        .route(
            "/api/ceo/notifications/{id}/read",
            post(mark_notification_read),
        )
        .route("/api/ceo/toasts", get(drain_toasts))
        .route("/api/ceo/metrics", get(get_metrics))
        .route("/api/ceo/metrics/refresh", post(refresh_metrics))
        .route("/api/ceo/finance/calculate", post(calculate_finance))
        .route("/api/ceo/sellers", get(list_sellers))
        .route("/api/ceo/sellers/dashboard", post(seller_dashboard))
        .route("/api/ceo/sellers/{id}/approve", post(approve_seller))
        .route("/api/ceo/sellers/{id}/reject", post(reject_seller))
        .route("/api/ceo/incidents", get(list_incidents))
        .route("/api/ceo/incidents/{id}/resolve", post(resolve_incident))
        .route("/api/ceo/executive/{role}", post(executive_access))
        .route(
            "/api/ceo/website/homepage",
            get(get_homepage).put(update_homepage),
        )
        .route("/api/ceo/profile", get(get_profile).put(update_profile))
        .route_layer(middleware::from_fn_with_state(state, auth::require_session));

    Router::new()
        .route("/api/ceo/login", post(login))
        .route("/api/ceo/session", get(session_status))
        .merge(protected)
}

/// Full application: console routes, permissive CORS for the dashboard
/// frontend, shared state attached.
pub fn app(state: AppState) -> Router {
    router(state.clone())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
