//! Notification model
//!
//! The core only says *what* happened; wording and styling belong to whoever
//! renders the toast.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::risk::{Category, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    AssetEvaluated { activo: String, categoria: Category },
    AssetNameRequired,
    AnalysisFailed { activo: String, reason: String },
    RecommendationsGenerated { rows: usize },
    NoRisksToRecommend,
    RecommendationFailed { reason: String },
    CellValueRequired { key: String, column: Column },
    CellValueInvalid { key: String, column: Column, value: String },
    RowDeleted { key: String },
    LoggedIn { user: String },
    LoggedOut { user: String },
}

impl NotificationEvent {
    pub fn level(&self) -> NotificationLevel {
        match self {
            Self::AssetEvaluated { .. } | Self::RecommendationsGenerated { .. } | Self::LoggedIn { .. } => {
                NotificationLevel::Success
            }
            Self::RowDeleted { .. } | Self::LoggedOut { .. } => NotificationLevel::Info,
            Self::NoRisksToRecommend => NotificationLevel::Warning,
            Self::AssetNameRequired
            | Self::AnalysisFailed { .. }
            | Self::RecommendationFailed { .. }
            | Self::CellValueRequired { .. }
            | Self::CellValueInvalid { .. } => NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: NotificationEvent,
}

impl Notification {
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: event.level(),
            at: Utc::now(),
            event,
        }
    }
}

impl From<NotificationEvent> for Notification {
    fn from(event: NotificationEvent) -> Self {
        Self::new(event)
    }
}
