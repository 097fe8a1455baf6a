//! EV charging site optimization engine
//!
//! Takes a target location, generates candidate sites around it, scores
//! each site on five independent dimensions (traffic, grid, competition,
//! demographics, ROI), aggregates the partial results with failure-aware
//! renormalization, attaches best-effort narratives and returns a ranked,
//! capped recommendation list.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod runner;
pub mod services;
pub mod traits;
pub mod types;

pub use config::OptimizerConfig;
pub use error::{OptimizerError, OptimizerResult};
pub use orchestrator::OptimizerOrchestrator;
pub use runner::EvaluationRunner;
