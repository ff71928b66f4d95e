//! Recommend-all handler

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::logic::workflow::RecommendOutcome;

/// Generate ISO 27001 treatments for every row
pub async fn generate(State(state): State<AppState>) -> AppResult<Json<RecommendOutcome>> {
    let outcome = state.workflow.recommend_all().await?;
    Ok(Json(outcome))
}
