//! Session handlers

use axum::{extract::State, Json};
use serde::Serialize;
use validator::Validate;

use crate::{AppState, AppResult};
use crate::middleware::auth::AnalystContext;
use crate::models::{LoginRequest, LoginResponse, Notification, NotificationEvent, SessionInfo};

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub notification: Notification,
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()?;

    let session = state.sessions.login(&req.username, &req.password)?;

    Ok(Json(LoginResponse {
        notification: Notification::new(NotificationEvent::LoggedIn {
            user: session.user.clone(),
        }),
        token: session.token,
        user: session.user,
        expires_at: session.expires_at,
    }))
}

/// Logout endpoint, revokes the presented token
pub async fn logout(
    State(state): State<AppState>,
    analyst: AnalystContext,
) -> AppResult<Json<LogoutResponse>> {
    let user = state.sessions.logout(&analyst.token)?;

    Ok(Json(LogoutResponse {
        notification: Notification::new(NotificationEvent::LoggedOut { user }),
    }))
}

/// Who is logged in
pub async fn current(
    State(state): State<AppState>,
    analyst: AnalystContext,
) -> Json<SessionInfo> {
    Json(SessionInfo {
        authenticated: state.sessions.is_authenticated(&analyst.token),
        user: analyst.user,
        expires_at: analyst.expires_at,
    })
}
