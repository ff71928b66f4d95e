//! Workflow Runner
//!
//! Async half of both workflows. The controller lock is taken only for the
//! synchronous begin/complete steps; the engine call runs without it.
//!
//! Each workflow runs on its own spawned task, so a caller that stops
//! waiting (dropped request, closed dialog) does not stop the work: a started
//! analysis or recommendation pass always applies its result.

use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::WorkflowController;
use super::types::*;
use crate::logic::cancel::CancellationToken;
use crate::logic::engine::{EngineError, EngineInfo};
use crate::logic::inference::RiskInferenceBackend;
use crate::logic::recommendation::{RecommendationBackend, TreatmentRequest};
use crate::models::{Category, Notification, NotificationEvent, RiskProfile};

pub type SharedWorkflow = Arc<Mutex<WorkflowController>>;

#[derive(Clone)]
pub struct WorkflowRunner {
    state: SharedWorkflow,
    inference: Arc<dyn RiskInferenceBackend>,
    recommender: Arc<dyn RecommendationBackend>,
}

impl WorkflowRunner {
    pub fn new(inference: Arc<dyn RiskInferenceBackend>, recommender: Arc<dyn RecommendationBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkflowController::new())),
            inference,
            recommender,
        }
    }

    /// Shared controller for the synchronous operations (dialog, grid, delete)
    pub fn controller(&self) -> &SharedWorkflow {
        &self.state
    }

    pub fn inference_info(&self) -> EngineInfo {
        self.inference.info()
    }

    pub fn recommender_info(&self) -> EngineInfo {
        self.recommender.info()
    }

    /// Profile for a name without touching the register
    pub async fn preview_profile(&self, asset_name: &str) -> Result<RiskProfile, EngineError> {
        self.inference.analyze(asset_name, &CancellationToken::new()).await
    }

    /// Treatment for one (asset, category) pair without touching the register
    pub async fn preview_treatment(&self, activo: &str, categoria: Category) -> Result<String, EngineError> {
        let request = TreatmentRequest {
            key: String::new(),
            activo: activo.to_string(),
            categoria,
        };
        let mut treatments = self
            .recommender
            .recommend_all(std::slice::from_ref(&request), &CancellationToken::new())
            .await?;
        treatments
            .pop()
            .ok_or_else(|| EngineError::Backend("no treatment returned".to_string()))
    }

    /// Submit the dialog draft and wait for the analysis to land
    pub async fn evaluate(&self) -> Result<EvaluationOutcome, WorkflowError> {
        let submitted = self.state.lock().submit_evaluation();
        let pending = match submitted {
            Ok(pending) => pending,
            Err(WorkflowError::AssetNameRequired) => {
                return Ok(EvaluationOutcome::Rejected {
                    notification: Notification::new(NotificationEvent::AssetNameRequired),
                });
            }
            Err(err) => return Err(err),
        };

        let state = self.state.clone();
        let inference = self.inference.clone();
        let task = tokio::spawn(async move {
            let result = inference.analyze(&pending.activo, &pending.cancel).await;
            state.lock().complete_evaluation(pending, result)
        });

        task.await.map_err(|e| WorkflowError::TaskFailed(e.to_string()))
    }

    /// Run a recommendation pass over every row. Rounds repeat until no row
    /// changed or appeared while the backend was running.
    pub async fn recommend_all(&self) -> Result<RecommendOutcome, WorkflowError> {
        let started = self.state.lock().begin_recommendation()?;
        let pending = match started {
            RecommendStart::Started(pending) => pending,
            RecommendStart::Rejected(notification) => return Ok(RecommendOutcome::Rejected { notification }),
        };

        let state = self.state.clone();
        let recommender = self.recommender.clone();
        let task = tokio::spawn(async move {
            let mut pending = pending;
            loop {
                let result = recommender.recommend_all(&pending.requests, &pending.cancel).await;
                let step = state.lock().complete_recommendation(pending, result);
                match step {
                    RecommendStep::Done(outcome) => return outcome,
                    RecommendStep::Continue(next) => pending = next,
                }
            }
        });

        task.await.map_err(|e| WorkflowError::TaskFailed(e.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
