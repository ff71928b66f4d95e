//! Recommendation Module
//!
//! (asset name, category) -> ISO 27001 treatment text.
//!
//! ## Structure
//! - `controls`: the two-level control table and its fallback (`recommend`)
//! - `backend`: async backend trait + the rule-table backend with latency

pub mod controls;
pub mod backend;

pub use backend::{RecommendationBackend, RuleTableRecommender, TreatmentRequest};
