//! The plan-driven table cleaning pipeline.
//!
//! Ten ordered transformation steps, toggled and parameterized by a
//! [`scour_model::CleaningPlan`], executed deterministically against a
//! polars `DataFrame`. [`run_pipeline`] ties profile, plan, execution, and
//! the before/after report together.

pub mod diff;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod steps;

pub use error::{CleanError, Result};
pub use pipeline::{run_pipeline, run_pipeline_with_plan};
pub use steps::dedupe::{DedupKeep, DedupOptions};
