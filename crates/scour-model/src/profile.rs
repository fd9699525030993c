//! The table profile: an immutable statistical/structural summary of a table
//! at one point in time.
//!
//! Profiles are produced by `scour-profile`, consumed by the plan builders,
//! and embedded verbatim in run reports. All fields are plain data and
//! JSON-serializable; statistics that would be non-finite are omitted at
//! computation time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Coarse shape classification of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    /// At least one datetime column and at least one numeric column.
    TimeSeries,
    /// No datetime column at all.
    #[default]
    Tabular,
    /// Datetime columns but no numeric signal.
    Mixed,
}

/// Column names grouped by type family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroups {
    pub datetime: Vec<String>,
    pub numeric: Vec<String>,
    pub boolean: Vec<String>,
    pub categorical: Vec<String>,
}

/// Sizes of the groups in [`ColumnGroups`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub datetime: usize,
    pub numeric: usize,
    pub boolean: usize,
    pub categorical: usize,
}

/// Missingness signals. Fractions are in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Missingness {
    /// Mean of the per-column missing fractions (not cell-weighted).
    pub overall_fraction: f64,
    pub per_column: BTreeMap<String, f64>,
    /// Worst columns by missing fraction, descending.
    pub top_missing: Vec<ColumnFraction>,
}

/// A (column, fraction) pair used in ranked lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFraction {
    pub column: String,
    pub fraction: f64,
}

/// Distinct non-missing value count for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityEntry {
    pub column: String,
    pub unique_values: usize,
}

/// Duplicate-row signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateStats {
    pub duplicate_rows: usize,
    pub duplicate_fraction: f64,
}

/// String hygiene signals for one text column, sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StringQuality {
    /// Fraction of sampled values with leading/trailing whitespace.
    pub leading_trailing_fraction: f64,
    /// Fraction of sampled values that are empty after stripping.
    pub empty_after_strip_fraction: f64,
    /// Fraction of sampled values that look like missing-value markers.
    pub missing_marker_fraction: f64,
}

/// A categorical column whose observed values form a true/false token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCandidate {
    pub column: String,
    pub values_sample: Vec<String>,
}

/// A categorical column whose sampled values mostly parse as dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatetimeCandidate {
    pub column: String,
    pub success_ratio: f64,
    pub letters_ratio: f64,
}

/// Per-column skewness plus the top-K ranking by absolute value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkewnessSignals {
    pub per_numeric_column: BTreeMap<String, f64>,
    pub top_abs_skewed: Vec<ColumnStat>,
}

/// A (column, statistic) pair used in ranked lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStat {
    pub column: String,
    pub value: f64,
}

/// IQR outlier fraction for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierSignal {
    /// Fraction of non-missing values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub fraction: f64,
    pub iqr_k: f64,
}

/// Outlier fractions plus the top-K ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierSignals {
    pub per_numeric_column: BTreeMap<String, OutlierSignal>,
    pub top_outlier_columns: Vec<String>,
}

/// One pairwise Pearson correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub col_x: String,
    pub col_y: String,
    pub corr: f64,
}

/// Top-K absolute pairwise correlations among numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSignals {
    pub top_abs_pairs: Vec<CorrelationPair>,
    pub max_abs_corr: Option<f64>,
}

/// A structured signal report for one table at one point in time.
///
/// Pure data: never mutated after creation. The `Default` value describes an
/// empty table and exists for tests and fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub n_rows: usize,
    pub n_cols: usize,
    pub memory_bytes: usize,
    pub memory_mb: f64,

    /// Per-column polars dtype, rendered as a string. Used for report diffs.
    pub dtypes: BTreeMap<String, String>,
    pub columns: ColumnGroups,
    pub counts: GroupCounts,

    pub has_time_index: bool,
    pub time_column: Option<String>,
    pub dataset_type: DatasetType,

    pub missingness: Missingness,
    pub categorical_cardinality: Vec<CardinalityEntry>,
    pub warnings: Vec<String>,
    pub duplicates: DuplicateStats,
    pub string_quality: BTreeMap<String, StringQuality>,
    pub boolean_candidates: Vec<BooleanCandidate>,
    pub datetime_candidates: Vec<DatetimeCandidate>,
    pub skewness: SkewnessSignals,
    pub outliers: OutlierSignals,
    pub correlation: CorrelationSignals,
}

impl TableProfile {
    /// Overall missingness as a percentage, for display and notes.
    pub fn overall_missing_pct(&self) -> f64 {
        self.missingness.overall_fraction * 100.0
    }

    /// Whether any numeric column shows a material skew signal.
    pub fn has_skew_signal(&self) -> bool {
        !self.skewness.top_abs_skewed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_type_wire_names() {
        let json = serde_json::to_string(&DatasetType::TimeSeries).expect("serialize");
        assert_eq!(json, "\"time_series\"");
        let back: DatasetType = serde_json::from_str("\"tabular\"").expect("deserialize");
        assert_eq!(back, DatasetType::Tabular);
    }
}
