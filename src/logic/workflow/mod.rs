//! Workflow Module
//!
//! Evaluate-asset and recommend-all workflows over one shared register.
//!
//! ## Structure
//! - `types`: workflow states, errors, tickets and outcomes
//! - `controller`: synchronous state machine (sole writer of the registry)
//! - `runner`: async orchestration around the engine backends

pub mod types;
pub mod controller;
pub mod runner;

pub use types::*;
pub use runner::WorkflowRunner;
