//! Search orchestration module
//!
//! Runs the source strategies in priority order and always yields text.

mod models;
mod orchestrator;

pub use models::*;
pub use orchestrator::{Orchestrator, NO_RESULTS};
