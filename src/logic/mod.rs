//! Core logic
//!
//! ## Structure
//! - `assets`: the five assets both rule tables know
//! - `inference`: asset name -> risk profile
//! - `recommendation`: (asset, category) -> ISO 27001 treatment
//! - `registry`: ordered in-memory register of evaluated assets
//! - `grid`: per-cell edit state machine
//! - `workflow`: evaluate-asset / recommend-all orchestration
//! - `engine`, `cancel`: shared backend plumbing
//! - `session`: analyst sessions

pub mod assets;
pub mod cancel;
pub mod engine;
pub mod inference;
pub mod recommendation;
pub mod registry;
pub mod grid;
pub mod workflow;
pub mod session;
