//! Evaluate-asset dialog handlers

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::optional_json;
use crate::{AppState, AppResult};
use crate::logic::workflow::{EvaluationOutcome, EvaluationState};

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub activo: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRequest {
    /// Replaces the dialog draft before submitting
    pub activo: Option<String>,
}

/// Open the add-asset dialog
pub async fn open(State(state): State<AppState>) -> AppResult<Json<EvaluationState>> {
    let mut ctl = state.workflow.controller().lock();
    ctl.open_dialog()?;
    Ok(Json(ctl.evaluation_state().clone()))
}

/// Update the asset-name field
pub async fn draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> AppResult<Json<EvaluationState>> {
    let mut ctl = state.workflow.controller().lock();
    ctl.set_draft(req.activo)?;
    Ok(Json(ctl.evaluation_state().clone()))
}

/// Close the dialog
pub async fn dismiss(State(state): State<AppState>) -> Json<EvaluationState> {
    let mut ctl = state.workflow.controller().lock();
    ctl.dismiss_dialog();
    Json(ctl.evaluation_state().clone())
}

/// Submit the dialog and wait for the analysis. An empty name is a 422
/// carrying the notification; the dialog stays open.
pub async fn submit(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<EvaluationOutcome>)> {
    if let Some(SubmitRequest { activo: Some(activo) }) = optional_json(&body)? {
        state.workflow.controller().lock().set_draft(activo)?;
    }

    let outcome = state.workflow.evaluate().await?;
    let status = match outcome {
        EvaluationOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}
