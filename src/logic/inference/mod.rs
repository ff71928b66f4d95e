//! Risk Inference Module
//!
//! Asset name -> risk profile.
//!
//! ## Structure
//! - `profiles`: the fixed rule table and its fallback (`classify`)
//! - `backend`: async backend trait + the rule-table backend with latency

pub mod profiles;
pub mod backend;

pub use backend::{RiskInferenceBackend, RuleTableInference};
