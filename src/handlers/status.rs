//! Engine status handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::logic::engine::EngineInfo;
use crate::logic::workflow::{EvaluationState, RecommendState};
use crate::models::{Category, Probability};

#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub inference: EngineInfo,
    pub recommendation: EngineInfo,
}

/// Severity colour hint for one tier label
#[derive(Debug, Serialize)]
pub struct TierColor {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Palette {
    pub probabilidad: Vec<TierColor>,
    pub categoria: Vec<TierColor>,
}

impl Palette {
    fn build() -> Self {
        Self {
            probabilidad: Probability::ALL
                .iter()
                .map(|p| TierColor { label: p.as_str(), color: p.color() })
                .collect(),
            categoria: Category::ALL
                .iter()
                .map(|c| TierColor { label: c.as_str(), color: c.color() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub environment: String,
    pub engine: EngineStatus,
    pub evaluation: EvaluationState,
    pub recommendations: RecommendState,
    pub rows: usize,
    pub palette: Palette,
}

pub async fn engine_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let engine = EngineStatus {
        inference: state.workflow.inference_info(),
        recommendation: state.workflow.recommender_info(),
    };
    let status = if engine.inference.operational && engine.recommendation.operational {
        "operational"
    } else {
        "degraded"
    };

    let ctl = state.workflow.controller().lock();
    Json(StatusResponse {
        status,
        environment: state.config.environment.clone(),
        engine,
        evaluation: ctl.evaluation_state().clone(),
        recommendations: ctl.recommend_state(),
        rows: ctl.registry().len(),
        palette: Palette::build(),
    })
}
