//! Pure engine logic: aggregation, ranking and run-state tracking

pub mod aggregator;
pub mod ranking;
pub mod state;

pub use state::{RunLog, RunPhase};
