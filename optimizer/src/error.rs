//! Optimizer-specific error types
//!
//! Only three conditions fail an entire run: bad request parameters, an
//! empty candidate set, and every candidate losing every dimension. All
//! other failures are contained and surfaced in run metadata.

use shared::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("no candidate sites found for {location}: {cause}")]
    NoCandidatesFound { location: String, cause: String },

    #[error("all {sites} candidate sites failed evaluation")]
    AllEvaluationsFailed { sites: usize },

    #[error("configuration error: {field}")]
    Configuration { field: String },
}

pub type OptimizerResult<T> = Result<T, OptimizerError>;
