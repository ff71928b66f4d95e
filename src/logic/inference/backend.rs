//! Inference Backends
//!
//! Async seam in front of `classify`. The workflow only ever talks to a
//! `RiskInferenceBackend`, so a model-backed engine can replace the rule
//! table without touching the registry or the grid.

use std::time::Duration;

use async_trait::async_trait;

use super::profiles::classify;
use crate::logic::cancel::CancellationToken;
use crate::logic::engine::{EngineError, EngineInfo};
use crate::models::RiskProfile;

#[async_trait]
pub trait RiskInferenceBackend: Send + Sync {
    fn info(&self) -> EngineInfo;

    async fn analyze(&self, asset_name: &str, cancel: &CancellationToken) -> Result<RiskProfile, EngineError>;
}

/// Rule table behind a fixed simulated latency
#[derive(Debug, Clone)]
pub struct RuleTableInference {
    latency: Duration,
}

impl RuleTableInference {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for RuleTableInference {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl RiskInferenceBackend for RuleTableInference {
    fn info(&self) -> EngineInfo {
        EngineInfo::rule_table(self.latency)
    }

    async fn analyze(&self, asset_name: &str, _cancel: &CancellationToken) -> Result<RiskProfile, EngineError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let profile = classify(asset_name);
        tracing::debug!(asset = asset_name, categoria = %profile.categoria, "Risk profile derived");
        Ok(profile)
    }
}
