//! Pipeline errors.
//!
//! Per-column failures inside a step are not errors: the step skips the
//! column and records it. These variants cover frame-level operations that
//! genuinely cannot proceed.

use polars::error::PolarsError;
use scour_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("table operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CleanError>;
