use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::console::now_ms;
use crate::model::toast::Toast;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-ceo-session";

/// Error answer for every route: a status plus the toast the dashboard shows.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub toast: Toast,
}

impl ApiError {
    pub fn new(status: StatusCode, toast: Toast) -> Self {
        Self { status, toast }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, Toast::warning(message))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::InvalidPasskey | AuthError::NotAuthenticated | AuthError::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::DeviceLimit { .. } => StatusCode::FORBIDDEN,
            AuthError::Storage(e) => {
                error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.toast())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Storage(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.toast)).into_response()
    }
}

/// Route layer for everything behind the passkey. Runs the timeout check,
/// matches `x-ceo-session` and counts the request as activity.
pub async fn require_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let verdict = state
        .console
        .lock()
        .await
        .authorize(presented.as_deref(), now_ms());

    if let Err(err) = verdict {
        if matches!(err, AuthError::SessionExpired) {
            state.stop_live_updates().await;
        }
        warn!(path = %req.uri().path(), error = %err, "request rejected");
        return Err(err.into());
    }

    Ok(next.run(req).await)
}
