//! Workflow Types

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::logic::cancel::CancellationToken;
use crate::logic::grid::OpenEdit;
use crate::logic::recommendation::TreatmentRequest;
use crate::models::{Notification, RiskRow};

// ============================================================================
// STATES
// ============================================================================

/// Evaluate-asset workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EvaluationState {
    Idle,
    ModalOpen {
        draft: String,
        /// Last submit was rejected for an empty name
        name_required: bool,
    },
    /// Inputs disabled. `dialog_visible` drops to false if the analyst
    /// dismisses the dialog; the analysis still completes.
    Analyzing {
        activo: String,
        dialog_visible: bool,
    },
}

impl EvaluationState {
    pub fn dialog_visible(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::ModalOpen { .. } => true,
            Self::Analyzing { dialog_visible, .. } => *dialog_visible,
        }
    }
}

/// Recommend-all workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendState {
    Disabled,
    Enabled,
    Recommending,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("asset name is required")]
    AssetNameRequired,
    #[error("the add-asset dialog is not open")]
    DialogClosed,
    #[error("an asset analysis is already in progress")]
    AnalysisInProgress,
    #[error("a recommendation pass is already in progress")]
    RecommendationInProgress,
    #[error("workflow task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// IN-FLIGHT WORK
// ============================================================================

/// Ticket for an accepted submit, carried across the analysis await
#[derive(Debug, Clone)]
pub struct PendingEvaluation {
    pub id: Uuid,
    pub activo: String,
    pub cancel: CancellationToken,
}

/// Rows the next backend call of a recommendation pass works on.
///
/// A pass runs in rounds. `settled` holds, per key, the inputs the row's
/// treatment was last written from during this pass; any row whose current
/// inputs differ from that goes into the next round's `requests`.
#[derive(Debug, Clone)]
pub struct PendingRecommendation {
    pub id: Uuid,
    pub round: u32,
    pub requests: Vec<TreatmentRequest>,
    pub settled: HashMap<String, TreatmentRequest>,
    pub cancel: CancellationToken,
}

/// Result of applying one round of a recommendation pass
#[derive(Debug, Clone)]
pub enum RecommendStep {
    /// Pass finished, workflow back to `Enabled`
    Done(RecommendOutcome),
    /// Rows changed or appeared while the round ran; recompute them
    Continue(PendingRecommendation),
}

#[derive(Debug, Clone)]
pub enum RecommendStart {
    Started(PendingRecommendation),
    /// Nothing to recommend for; state untouched
    Rejected(Notification),
}

// ============================================================================
// OUTCOMES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Evaluated { row: RiskRow, notification: Notification },
    /// Empty asset name, dialog stays open
    Rejected { notification: Notification },
    Failed { notification: Notification },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendOutcome {
    Applied { rows: Vec<RiskRow>, notification: Notification },
    Rejected { notification: Notification },
    Failed { notification: Notification },
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSnapshot {
    pub rows: Vec<RiskRow>,
    pub next_key: u64,
    pub evaluation: EvaluationState,
    pub dialog_visible: bool,
    pub recommendations: RecommendState,
    pub recommendations_available: bool,
    pub open_edits: Vec<OpenEdit>,
}
