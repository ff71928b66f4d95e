//! Recommendation Backends

use std::time::Duration;

use async_trait::async_trait;

use super::controls::recommend;
use crate::logic::cancel::CancellationToken;
use crate::logic::engine::{EngineError, EngineInfo};
use crate::models::Category;

/// One row's input to a recommendation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentRequest {
    pub key: String,
    pub activo: String,
    pub categoria: Category,
}

#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    fn info(&self) -> EngineInfo;

    /// One treatment per request, same order as `requests`.
    async fn recommend_all(
        &self,
        requests: &[TreatmentRequest],
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, EngineError>;
}

/// Treatment table behind one fixed latency per pass
#[derive(Debug, Clone)]
pub struct RuleTableRecommender {
    latency: Duration,
}

impl RuleTableRecommender {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for RuleTableRecommender {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl RecommendationBackend for RuleTableRecommender {
    fn info(&self) -> EngineInfo {
        EngineInfo::rule_table(self.latency)
    }

    async fn recommend_all(
        &self,
        requests: &[TreatmentRequest],
        _cancel: &CancellationToken,
    ) -> Result<Vec<String>, EngineError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(requests
            .iter()
            .map(|req| recommend(&req.activo, req.categoria))
            .collect())
    }
}
