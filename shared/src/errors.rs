//! Shared error types for the site optimization engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected request parameter. Fatal to the run and raised before any
/// scoring begins.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure reasons for external data-source and LLM requests.
///
/// These are always contained at the (site, dimension) or narration level;
/// they never abort other dimensions or other sites.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("service temporarily unavailable")]
    ServiceUnavailable,

    #[error("authentication failed")]
    Unauthorized,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no data found: {0}")]
    NoData(String),

    #[error("geocoding failed: {0}")]
    Geocoding(String),
}

impl DataSourceError {
    /// Map a non-2xx HTTP status onto the failure taxonomy
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => DataSourceError::Unauthorized,
            429 => DataSourceError::RateLimited,
            503 => DataSourceError::ServiceUnavailable,
            other => DataSourceError::Network(format!("HTTP status {other}")),
        }
    }
}
