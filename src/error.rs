//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::engine::EngineError;
use crate::logic::grid::GridError;
use crate::logic::session::AuthError;
use crate::logic::workflow::WorkflowError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Auth errors
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    Unauthorized,

    // Resource errors
    NotFound(String),
    Conflict(String),

    // Validation errors
    ValidationError(String),

    // Engine backend errors
    ExternalServiceError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Session has expired"),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid session"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::ExternalServiceError(msg) => {
                tracing::error!("Engine backend error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Engine backend error")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::TokenExpired => AppError::TokenExpired,
            AuthError::TokenInvalid | AuthError::Revoked => AppError::TokenInvalid,
            AuthError::Hashing(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::AssetNameRequired => AppError::ValidationError(err.to_string()),
            WorkflowError::DialogClosed
            | WorkflowError::AnalysisInProgress
            | WorkflowError::RecommendationInProgress => AppError::Conflict(err.to_string()),
            WorkflowError::TaskFailed(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::RowNotFound(_) => AppError::NotFound(err.to_string()),
            GridError::NotEditable(_) | GridError::NotEditing => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Backend(msg) => AppError::ExternalServiceError(msg),
            EngineError::Cancelled => AppError::InternalError(err.to_string()),
        }
    }
}
