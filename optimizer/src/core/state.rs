//! Run-state machine and contained-failure log

use std::fmt;
use std::time::Instant;

use tracing::info;

use shared::RunError;

/// Phases of one optimization run.
/// `Received -> GeneratingCandidates -> Evaluating -> Aggregating ->
/// Narrating -> Ranking -> Complete`; fatal errors abandon the run in
/// whatever phase it reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Received,
    GeneratingCandidates,
    Evaluating,
    Aggregating,
    Narrating,
    Ranking,
    Complete,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Received => "received",
            RunPhase::GeneratingCandidates => "generating_candidates",
            RunPhase::Evaluating => "evaluating",
            RunPhase::Aggregating => "aggregating",
            RunPhase::Narrating => "narrating",
            RunPhase::Ranking => "ranking",
            RunPhase::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Per-run phase tracker and accumulator for contained failures.
/// Owned by the orchestrator for the duration of one run; the collected
/// errors become part of the result metadata.
pub struct RunLog {
    phase: RunPhase,
    errors: Vec<RunError>,
    started: Instant,
}

impl RunLog {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Received,
            errors: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn transition(&mut self, next: RunPhase) {
        info!(from = %self.phase, to = %next, "run phase transition");
        self.phase = next;
    }

    pub fn record(&mut self, error: RunError) {
        self.errors.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn into_errors(self) -> Vec<RunError> {
        self.errors
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}
