//! Per-step and whole-run reports.
//!
//! Every step returns a typed report fragment describing what it changed.
//! The orchestrator aggregates them into a [`RunReport`] together with the
//! pre/post profiles and the resolved plan. Reports are write-once and must
//! serialize to plain JSON (no NaN/Infinity; absent values become `null`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plan::{
    CategoricalStrategy, CleaningPlan, DatetimeStrategy, NumericStrategy, OutlierAction,
    OutlierMethod,
};
use crate::profile::TableProfile;

/// Column rename map produced by `normalize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub enabled: bool,
    /// Old name -> new name, only for columns that actually changed.
    pub renamed_columns: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimStringsReport {
    pub enabled: bool,
    pub columns_touched: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizeMissingReport {
    pub enabled: bool,
    pub columns_touched: Vec<String>,
    /// Cells replaced with the missing marker, per column.
    pub replaced_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastTypesReport {
    pub enabled: bool,
    pub converted_to_numeric: Vec<String>,
    pub converted_to_int: Vec<String>,
    pub converted_to_categorical: Vec<String>,
    pub parsed_money_columns: Vec<String>,
    pub parsed_percent_columns: Vec<String>,
    pub parsed_boolean_columns: Vec<String>,
    pub normalized_enum_columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeBooleansReport {
    pub enabled: bool,
    pub columns_converted: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropRulesReport {
    pub enabled: bool,
    pub missing_threshold: f64,
    pub row_missing_threshold: f64,
    pub drop_rows: bool,
    pub dropped_empty_columns: Vec<String>,
    pub dropped_constant_columns: Vec<String>,
    pub dropped_high_missing_columns: Vec<String>,
    pub dropped_rows_high_missing: usize,
    pub rows_before: usize,
    pub cols_before: usize,
    pub rows_after: usize,
    pub cols_after: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatetimeInferenceReport {
    pub enabled: bool,
    pub inferred_columns: Vec<String>,
    pub datetime_success_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeduplicateReport {
    pub enabled: bool,
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_duplicates: usize,
}

/// Bounds applied to one clipped column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub lo: f64,
    pub hi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutliersReport {
    pub enabled: bool,
    pub method: Option<OutlierMethod>,
    pub action: Option<OutlierAction>,
    pub columns_clipped: Vec<String>,
    pub bounds: BTreeMap<String, ClipBounds>,
    pub rows_removed: usize,
}

/// Dtype transition caused by filling (e.g. integer column filled with a
/// fractional mean).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtypeChange {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputeReport {
    pub enabled: bool,
    /// Set when the step was enabled by the plan but overridden off.
    pub skipped: bool,
    pub numeric_strategy: Option<NumericStrategy>,
    pub categorical_strategy: Option<CategoricalStrategy>,
    pub datetime_strategy: Option<DatetimeStrategy>,
    pub categorical_numeric_max_unique: u32,
    pub filled_counts: BTreeMap<String, usize>,
    /// Fill value used per column, rendered as a string.
    pub fill_values_used: BTreeMap<String, String>,
    /// Numeric columns imputed with the categorical strategy because their
    /// distinct-value count was at or below the ceiling.
    pub categorical_numeric_columns: Vec<String>,
    /// Columns left unfilled because their fill source was undefined
    /// (e.g. the mean of an all-missing column).
    pub unfilled_columns: Vec<String>,
    pub dtype_upcasts: BTreeMap<String, DtypeChange>,
    pub total_filled: usize,
}

/// All step reports, keyed by position in the canonical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepReports {
    pub normalize: NormalizeReport,
    pub trim_strings: TrimStringsReport,
    pub standardize_missing: StandardizeMissingReport,
    pub cast_types: CastTypesReport,
    pub encode_booleans: EncodeBooleansReport,
    pub drop_rules: DropRulesReport,
    pub datetime_inference: DatetimeInferenceReport,
    pub deduplicate: DeduplicateReport,
    pub outliers: OutliersReport,
    pub impute_missing: ImputeReport,
}

/// Before/after missing fraction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingChange {
    pub before: f64,
    pub after: f64,
}

/// The final aggregate returned from one pipeline invocation.
///
/// Created once per run; the caller owns durability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub pre_profile: TableProfile,
    /// The plan as executed, after validation/sanitization and overrides.
    pub cleaning_plan: CleaningPlan,
    pub steps: StepReports,
    pub post_profile: TableProfile,
    /// Dtype transitions between pre and post, changed columns only.
    pub dtype_changes: BTreeMap<String, DtypeChange>,
    /// Missing-fraction transitions between pre and post, changed columns only.
    pub missing_changes: BTreeMap<String, MissingChange>,
    pub rows_before: usize,
    pub cols_before: usize,
    pub rows_after: usize,
    pub cols_after: usize,
}
