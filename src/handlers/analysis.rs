//! Stateless analysis handlers
//!
//! Run the engines for a single asset without touching the register.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{Category, Probability};

#[derive(Debug, Deserialize, Validate)]
pub struct RiskProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "activo is required"))]
    pub activo: String,
}

#[derive(Debug, Serialize)]
pub struct RiskProfileResponse {
    pub activo: String,
    pub riesgo: String,
    pub impacto: String,
    pub probabilidad: Probability,
    pub categoria: Category,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TreatmentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "activo is required"))]
    pub activo: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "riesgo is required"))]
    pub riesgo: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "impacto is required"))]
    pub impacto: String,
    pub categoria: Option<Category>,
    pub probabilidad: Option<Probability>,
}

#[derive(Debug, Serialize)]
pub struct TreatmentResponse {
    pub activo: String,
    pub riesgo: String,
    pub impacto: String,
    pub categoria: Category,
    pub probabilidad: Probability,
    pub tratamiento: String,
}

/// Risk profile for one asset name
pub async fn risk_profile(
    State(state): State<AppState>,
    Json(req): Json<RiskProfileRequest>,
) -> AppResult<Json<RiskProfileResponse>> {
    req.validate()?;

    let profile = state.workflow.preview_profile(&req.activo).await?;

    Ok(Json(RiskProfileResponse {
        activo: req.activo,
        riesgo: profile.riesgo,
        impacto: profile.impacto,
        probabilidad: profile.probabilidad,
        categoria: profile.categoria,
    }))
}

/// ISO 27001 treatment for one asset
pub async fn treatment(
    State(state): State<AppState>,
    Json(req): Json<TreatmentRequest>,
) -> AppResult<Json<TreatmentResponse>> {
    req.validate()?;

    let categoria = req.categoria.unwrap_or(Category::Medio);
    let probabilidad = req.probabilidad.unwrap_or(Probability::Media);
    let tratamiento = state.workflow.preview_treatment(&req.activo, categoria).await?;

    Ok(Json(TreatmentResponse {
        activo: req.activo,
        riesgo: req.riesgo,
        impacto: req.impacto,
        categoria,
        probabilidad,
        tratamiento,
    }))
}
