//! Shared engine backend types

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("analysis cancelled")]
    Cancelled,
    #[error("engine backend failed: {0}")]
    Backend(String),
}

/// What an engine backend reports about itself on the status endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub kind: &'static str,
    pub latency_ms: u64,
    pub operational: bool,
}

impl EngineInfo {
    pub fn rule_table(latency: Duration) -> Self {
        Self {
            kind: "rule-table",
            latency_ms: latency.as_millis() as u64,
            operational: true,
        }
    }
}
