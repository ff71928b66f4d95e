//! Workflow Controller
//!
//! Synchronous half of both workflows. Owns the registry and the grid, and is
//! the only code that calls `RiskRegistry::create` / `bulk_update`.
//!
//! Async work is split into `begin_*` (validate + transition) and
//! `complete_*` (apply result), so no lock is held while an engine runs.

use std::collections::HashMap;

use uuid::Uuid;

use super::types::*;
use crate::logic::cancel::CancellationToken;
use crate::logic::engine::EngineError;
use crate::logic::grid::{CellState, CommitOutcome, EditableGrid, GridError};
use crate::logic::recommendation::TreatmentRequest;
use crate::logic::registry::RiskRegistry;
use crate::models::{Column, Notification, NotificationEvent, RiskProfile, RiskRow};

#[derive(Debug, Clone)]
pub struct WorkflowController {
    registry: RiskRegistry,
    grid: EditableGrid,
    evaluation: EvaluationState,
    recommend: RecommendState,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self {
            registry: RiskRegistry::new(),
            grid: EditableGrid::new(),
            evaluation: EvaluationState::Idle,
            recommend: RecommendState::Disabled,
        }
    }

    pub fn registry(&self) -> &RiskRegistry {
        &self.registry
    }

    pub fn evaluation_state(&self) -> &EvaluationState {
        &self.evaluation
    }

    pub fn recommend_state(&self) -> RecommendState {
        self.recommend
    }

    /// Set once the first asset is evaluated; deleting rows does not clear it.
    pub fn recommendations_available(&self) -> bool {
        self.recommend != RecommendState::Disabled
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            rows: self.registry.list(),
            next_key: self.registry.next_key(),
            evaluation: self.evaluation.clone(),
            dialog_visible: self.evaluation.dialog_visible(),
            recommendations: self.recommend,
            recommendations_available: self.recommendations_available(),
            open_edits: self.grid.open_edits(),
        }
    }

    // ========================================================================
    // EVALUATE-ASSET WORKFLOW
    // ========================================================================

    /// Idle -> ModalOpen with an empty input
    pub fn open_dialog(&mut self) -> Result<(), WorkflowError> {
        match &self.evaluation {
            EvaluationState::Idle => {
                self.evaluation = EvaluationState::ModalOpen {
                    draft: String::new(),
                    name_required: false,
                };
                Ok(())
            }
            EvaluationState::ModalOpen { .. } => Ok(()),
            EvaluationState::Analyzing { .. } => Err(WorkflowError::AnalysisInProgress),
        }
    }

    pub fn set_draft(&mut self, value: impl Into<String>) -> Result<(), WorkflowError> {
        match &mut self.evaluation {
            EvaluationState::ModalOpen { draft, name_required } => {
                *draft = value.into();
                *name_required = false;
                Ok(())
            }
            EvaluationState::Analyzing { .. } => Err(WorkflowError::AnalysisInProgress),
            EvaluationState::Idle => Err(WorkflowError::DialogClosed),
        }
    }

    /// ModalOpen -> Idle. While Analyzing only the dialog goes away.
    pub fn dismiss_dialog(&mut self) {
        match &mut self.evaluation {
            EvaluationState::ModalOpen { .. } => self.evaluation = EvaluationState::Idle,
            EvaluationState::Analyzing { activo, dialog_visible } => {
                if *dialog_visible {
                    tracing::info!(activo = %activo, "Dialog dismissed, analysis continues");
                }
                *dialog_visible = false;
            }
            EvaluationState::Idle => {}
        }
    }

    /// Accept or reject the current draft. Accepted -> Analyzing.
    pub fn submit_evaluation(&mut self) -> Result<PendingEvaluation, WorkflowError> {
        let activo = match &mut self.evaluation {
            EvaluationState::Idle => return Err(WorkflowError::DialogClosed),
            EvaluationState::Analyzing { .. } => return Err(WorkflowError::AnalysisInProgress),
            EvaluationState::ModalOpen { draft, name_required } => {
                if draft.trim().is_empty() {
                    *name_required = true;
                    tracing::debug!("Evaluation rejected: empty asset name");
                    return Err(WorkflowError::AssetNameRequired);
                }
                draft.clone()
            }
        };

        self.evaluation = EvaluationState::Analyzing {
            activo: activo.clone(),
            dialog_visible: true,
        };
        tracing::info!(activo = %activo, "Asset analysis started");

        Ok(PendingEvaluation {
            id: Uuid::new_v4(),
            activo,
            cancel: CancellationToken::new(),
        })
    }

    /// Analyzing -> Idle with a new row, or back to ModalOpen if the backend failed
    pub fn complete_evaluation(
        &mut self,
        pending: PendingEvaluation,
        result: Result<RiskProfile, EngineError>,
    ) -> EvaluationOutcome {
        match result {
            Ok(profile) => {
                let row = self.registry.create(profile, &pending.activo);
                self.evaluation = EvaluationState::Idle;
                if self.recommend == RecommendState::Disabled {
                    self.recommend = RecommendState::Enabled;
                }
                tracing::info!(
                    task = %pending.id,
                    key = %row.key,
                    activo = %row.activo,
                    categoria = %row.categoria,
                    "Asset evaluated"
                );

                let notification = Notification::new(NotificationEvent::AssetEvaluated {
                    activo: row.activo.clone(),
                    categoria: row.categoria,
                });
                EvaluationOutcome::Evaluated { row, notification }
            }
            Err(err) => {
                tracing::error!(task = %pending.id, activo = %pending.activo, error = %err, "Asset analysis failed");
                self.evaluation = EvaluationState::ModalOpen {
                    draft: pending.activo.clone(),
                    name_required: false,
                };

                let notification = Notification::new(NotificationEvent::AnalysisFailed {
                    activo: pending.activo,
                    reason: err.to_string(),
                });
                EvaluationOutcome::Failed { notification }
            }
        }
    }

    // ========================================================================
    // RECOMMEND-ALL WORKFLOW
    // ========================================================================

    pub fn begin_recommendation(&mut self) -> Result<RecommendStart, WorkflowError> {
        if self.recommend == RecommendState::Recommending {
            return Err(WorkflowError::RecommendationInProgress);
        }
        if self.registry.is_empty() {
            tracing::warn!("Recommendation requested with no risks registered");
            return Ok(RecommendStart::Rejected(Notification::new(
                NotificationEvent::NoRisksToRecommend,
            )));
        }

        let requests = self.current_requests();

        self.recommend = RecommendState::Recommending;
        tracing::info!(rows = requests.len(), "Recommendation pass started");

        Ok(RecommendStart::Started(PendingRecommendation {
            id: Uuid::new_v4(),
            round: 1,
            requests,
            settled: HashMap::new(),
            cancel: CancellationToken::new(),
        }))
    }

    /// Apply one round of a pass. A row is written only if its asset and
    /// category still match what the round was computed from. Rows that
    /// changed or appeared meanwhile go into another round; the pass returns
    /// to `Enabled` once every current row is settled.
    pub fn complete_recommendation(
        &mut self,
        mut pending: PendingRecommendation,
        result: Result<Vec<String>, EngineError>,
    ) -> RecommendStep {
        let treatments = match result {
            Ok(treatments) if treatments.len() == pending.requests.len() => treatments,
            Ok(treatments) => {
                let err = EngineError::Backend(format!(
                    "expected {} treatments, got {}",
                    pending.requests.len(),
                    treatments.len()
                ));
                return RecommendStep::Done(self.recommendation_failed(&pending, err));
            }
            Err(err) => return RecommendStep::Done(self.recommendation_failed(&pending, err)),
        };

        {
            let by_key: HashMap<&str, (&TreatmentRequest, &String)> = pending
                .requests
                .iter()
                .zip(treatments.iter())
                .map(|(req, text)| (req.key.as_str(), (req, text)))
                .collect();

            self.registry.bulk_update(|row| match by_key.get(row.key.as_str()) {
                Some((req, text)) if same_inputs(req, row) => RiskRow {
                    tratamiento: (*text).clone(),
                    ..row.clone()
                },
                _ => row.clone(),
            });
        }

        let mut written = 0;
        for req in &pending.requests {
            if self.registry.get(&req.key).is_some_and(|row| same_inputs(req, row)) {
                pending.settled.insert(req.key.clone(), req.clone());
                written += 1;
            }
        }

        let stale: Vec<TreatmentRequest> = self
            .current_requests()
            .into_iter()
            .filter(|req| pending.settled.get(&req.key) != Some(req))
            .collect();

        if !stale.is_empty() {
            tracing::info!(
                task = %pending.id,
                round = pending.round,
                written,
                stale = stale.len(),
                "Rows changed during recommendation round, recomputing"
            );
            pending.round += 1;
            pending.requests = stale;
            return RecommendStep::Continue(pending);
        }

        self.recommend = RecommendState::Enabled;
        let rows = self.registry.list();
        tracing::info!(task = %pending.id, rounds = pending.round, rows = rows.len(), "Recommendations applied");
        let notification = Notification::new(NotificationEvent::RecommendationsGenerated {
            rows: rows.len(),
        });
        RecommendStep::Done(RecommendOutcome::Applied { rows, notification })
    }

    fn recommendation_failed(&mut self, pending: &PendingRecommendation, err: EngineError) -> RecommendOutcome {
        self.recommend = RecommendState::Enabled;
        tracing::error!(task = %pending.id, round = pending.round, error = %err, "Recommendation pass failed");
        RecommendOutcome::Failed {
            notification: Notification::new(NotificationEvent::RecommendationFailed {
                reason: err.to_string(),
            }),
        }
    }

    fn current_requests(&self) -> Vec<TreatmentRequest> {
        self.registry
            .list()
            .into_iter()
            .map(|row| TreatmentRequest {
                key: row.key,
                activo: row.activo,
                categoria: row.categoria,
            })
            .collect()
    }

    // ========================================================================
    // ROWS / GRID
    // ========================================================================

    /// Explicit row deletion, the only way a row leaves the register
    pub fn delete_row(&mut self, key: &str) -> Option<Notification> {
        let existed = self.registry.get(key).is_some();
        self.registry.delete(key);
        self.grid.forget_row(key);

        existed.then(|| {
            tracing::info!(key, "Risk row deleted");
            Notification::new(NotificationEvent::RowDeleted { key: key.to_string() })
        })
    }

    pub fn edit_cell(&mut self, key: &str, column: Column) -> Result<CellState, GridError> {
        self.grid.activate(&self.registry, key, column)
    }

    pub fn input_cell(&mut self, key: &str, column: Column, value: impl Into<String>) -> Result<CellState, GridError> {
        self.grid.input(key, column, value)
    }

    pub fn commit_cell(&mut self, key: &str, column: Column) -> Result<CommitOutcome, GridError> {
        let outcome = self.grid.commit(&mut self.registry, key, column)?;
        if let CommitOutcome::Committed(row) = &outcome {
            tracing::info!(key = %row.key, ?column, "Cell committed");
        }
        Ok(outcome)
    }

    pub fn cell_state(&self, key: &str, column: Column) -> CellState {
        self.grid.cell_state(key, column)
    }
}

fn same_inputs(req: &TreatmentRequest, row: &RiskRow) -> bool {
    req.activo == row.activo && req.categoria == row.categoria
}

impl Default for WorkflowController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
