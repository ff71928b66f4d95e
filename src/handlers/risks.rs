//! Risk register handlers (rows + cell editing)

use axum::{
    body::Bytes,
    extract::{State, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::optional_json;
use crate::{AppState, AppResult, AppError};
use crate::logic::grid::{CellState, CommitOutcome, FieldError};
use crate::models::{Column, Notification, NotificationEvent, RiskRow};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub deleted: bool,
    pub notification: Option<Notification>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellValue {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CellResponse {
    pub key: String,
    pub column: Column,
    pub cell: CellState,
    pub row: Option<RiskRow>,
    pub notification: Option<Notification>,
}

/// List rows in insertion order
pub async fn list(State(state): State<AppState>) -> Json<Vec<RiskRow>> {
    Json(state.workflow.controller().lock().registry().list())
}

/// Delete one row. Unknown keys are a no-op.
pub async fn delete(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let notification = state.workflow.controller().lock().delete_row(&key);

    Json(DeleteResponse {
        deleted: notification.is_some(),
        key,
        notification,
    })
}

/// Viewing -> Editing
pub async fn edit_cell(
    State(state): State<AppState>,
    Path((key, column)): Path<(String, Column)>,
) -> AppResult<Json<CellResponse>> {
    let cell = state.workflow.controller().lock().edit_cell(&key, column)?;

    Ok(Json(CellResponse {
        key,
        column,
        cell,
        row: None,
        notification: None,
    }))
}

/// Replace the in-flight value of an editing cell
pub async fn input_cell(
    State(state): State<AppState>,
    Path((key, column)): Path<(String, Column)>,
    Json(req): Json<CellValue>,
) -> AppResult<Json<CellResponse>> {
    let cell = state.workflow.controller().lock().input_cell(&key, column, req.value)?;

    Ok(Json(CellResponse {
        key,
        column,
        cell,
        row: None,
        notification: None,
    }))
}

/// Commit path (enter key / blur). A non-empty body replaces the draft first.
pub async fn commit_cell(
    State(state): State<AppState>,
    Path((key, column)): Path<(String, Column)>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<CellResponse>)> {
    let replacement = optional_json::<CellValue>(&body)?;

    let mut ctl = state.workflow.controller().lock();
    if let Some(req) = replacement {
        ctl.input_cell(&key, column, req.value)?;
    }

    match ctl.commit_cell(&key, column)? {
        CommitOutcome::Committed(row) => Ok((
            StatusCode::OK,
            Json(CellResponse {
                cell: ctl.cell_state(&key, column),
                key,
                column,
                row: Some(row),
                notification: None,
            }),
        )),
        CommitOutcome::Rejected(error) => {
            let event = match &error {
                FieldError::Required { .. } => NotificationEvent::CellValueRequired {
                    key: key.clone(),
                    column,
                },
                FieldError::InvalidChoice { value, .. } => NotificationEvent::CellValueInvalid {
                    key: key.clone(),
                    column,
                    value: value.clone(),
                },
            };
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(CellResponse {
                    cell: ctl.cell_state(&key, column),
                    key,
                    column,
                    row: None,
                    notification: Some(Notification::new(event)),
                }),
            ))
        }
    }
}

/// Current state of one cell
pub async fn cell(
    State(state): State<AppState>,
    Path((key, column)): Path<(String, Column)>,
) -> AppResult<Json<CellResponse>> {
    let ctl = state.workflow.controller().lock();
    let row = ctl
        .registry()
        .get(&key)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("row '{}' not found", key)))?;

    Ok(Json(CellResponse {
        cell: ctl.cell_state(&key, column),
        key,
        column,
        row: Some(row),
        notification: None,
    }))
}
