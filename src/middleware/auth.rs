//! Session authentication middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::header::AUTHORIZATION,
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::{AppState, AppError};

/// Analyst context extracted from the session token
#[derive(Debug, Clone)]
pub struct AnalystContext {
    pub user: String,
    pub token: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Middleware: Require a live analyst session
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;

    let claims = state.sessions.verify(&token)?;

    let analyst_ctx = AnalystContext {
        user: claims.sub,
        expires_at: chrono::DateTime::from_timestamp(claims.exp as i64, 0),
        token,
    };

    // Insert into request extensions
    req.extensions_mut().insert(analyst_ctx);

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Result<String, AppError> {
    let auth_header = req.headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AnalystContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<AnalystContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
