//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::notification::Notification;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // Username
    pub jti: String, // Token ID
    pub exp: usize,  // Expiration timestamp
    pub iat: usize,  // Issued at
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub user: String,
    pub authenticated: bool,
    pub expires_at: Option<DateTime<Utc>>,
}
