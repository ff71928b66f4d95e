//! Asset catalog handler

use axum::Json;
use serde::Serialize;

use crate::models::{catalog, CatalogAsset};

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub activos: &'static [CatalogAsset],
}

pub async fn list() -> Json<CatalogResponse> {
    Json(CatalogResponse { activos: catalog() })
}
