//! Table profiling for the cleaning pipeline.
//!
//! Computes structural and statistical signals over a polars `DataFrame`
//! and packages them as a [`scour_model::TableProfile`]. The same type
//! tables (missing markers, boolean tokens, datetime formats) are exported
//! for the cleaning steps so detection and transformation agree.

pub mod kind;
pub mod parse;
pub mod profiler;
pub mod stats;
pub mod tokens;
pub mod values;

pub use kind::{ColumnKind, column_kind, is_datetime_dtype, is_integer_dtype, is_numeric_dtype};
pub use parse::{parse_datetime, parse_epoch_ms};
pub use profiler::profile_frame;
pub use tokens::{
    BOOLEAN_TOKEN_PAIRS, MISSING_MARKERS, boolean_token, is_boolean_value_set, is_missing_marker,
};
