//! Errors of the advisory (LLM) plan path.
//!
//! These never escape [`crate::build_plan`]: the policy composition catches
//! them and falls back to the rule-based plan, recording the failure in the
//! plan notes.

use thiserror::Error;

/// Failure of the advisory plan path.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The client could not be reached or refused the request.
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    /// The advisor returned an empty or whitespace-only response.
    #[error("advisor returned an empty response")]
    EmptyResponse,

    /// No JSON value could be extracted from the response text.
    #[error("no JSON found in advisor response: {0}")]
    Extraction(String),

    /// The extracted JSON did not have the plan's top-level shape.
    #[error("advisor plan rejected: {0}")]
    Schema(String),
}

impl AdvisorError {
    /// Short class name for fallback notes.
    pub fn class(&self) -> &'static str {
        match self {
            AdvisorError::Unavailable(_) => "unavailable",
            AdvisorError::EmptyResponse => "empty_response",
            AdvisorError::Extraction(_) => "extraction",
            AdvisorError::Schema(_) => "schema",
        }
    }
}
