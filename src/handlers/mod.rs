//! HTTP handlers

pub mod health;
pub mod session;
pub mod status;
pub mod catalog;
pub mod analysis;
pub mod workspace;
pub mod evaluation;
pub mod risks;
pub mod recommendations;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::{AppError, AppResult};

/// Optional JSON body. Empty means "nothing sent"; anything else must parse.
pub fn optional_json<T: DeserializeOwned>(body: &Bytes) -> AppResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::ValidationError(format!("invalid request body: {}", e)))
}
