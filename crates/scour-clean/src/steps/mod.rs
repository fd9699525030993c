//! The ten pipeline steps, one module each.
//!
//! Every step has the same contract: `(frame, enabled, parameters)` to
//! `(frame, report)`. A disabled step returns its input untouched with a
//! default report. Steps never fail because of a single bad column; the
//! column is skipped and the report shows what actually happened.

pub mod booleans;
pub mod cast;
pub mod datetime;
pub mod dedupe;
pub mod drop_rules;
pub mod impute;
pub mod missing;
pub mod normalize;
pub mod outliers;
pub mod trim;
