//! Workspace snapshot handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::logic::workflow::WorkspaceSnapshot;

pub async fn snapshot(State(state): State<AppState>) -> Json<WorkspaceSnapshot> {
    Json(state.workflow.controller().lock().snapshot())
}
