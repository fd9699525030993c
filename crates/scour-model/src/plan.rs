//! The cleaning plan: the validated, executable configuration that selects
//! which pipeline steps run and with what parameters.
//!
//! A plan is immutable once constructed. Untrusted input (advisor JSON) goes
//! through `scour-plan`'s validation and sanitization before it ever reaches
//! the pipeline; both produce values of the types defined here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Current plan schema version. Bump when the step vocabulary changes.
pub const PLAN_VERSION: u32 = 2;

/// The closed set of pipeline step names, in canonical execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Normalize,
    TrimStrings,
    StandardizeMissing,
    CastTypes,
    EncodeBooleans,
    DropRules,
    DatetimeInference,
    Deduplicate,
    Outliers,
    ImputeMissing,
}

impl StepName {
    /// All steps in canonical pipeline order. Later steps assume the
    /// normalization performed by earlier ones, so this order is fixed.
    pub const ALL: [StepName; 10] = [
        StepName::Normalize,
        StepName::TrimStrings,
        StepName::StandardizeMissing,
        StepName::CastTypes,
        StepName::EncodeBooleans,
        StepName::DropRules,
        StepName::DatetimeInference,
        StepName::Deduplicate,
        StepName::Outliers,
        StepName::ImputeMissing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepName::Normalize => "normalize",
            StepName::TrimStrings => "trim_strings",
            StepName::StandardizeMissing => "standardize_missing",
            StepName::CastTypes => "cast_types",
            StepName::EncodeBooleans => "encode_booleans",
            StepName::DropRules => "drop_rules",
            StepName::DatetimeInference => "datetime_inference",
            StepName::Deduplicate => "deduplicate",
            StepName::Outliers => "outliers",
            StepName::ImputeMissing => "impute_missing",
        }
    }

    /// Parse a step name from its wire form. Unknown names return `None`;
    /// the validator rejects them rather than guessing.
    pub fn parse(name: &str) -> Option<Self> {
        StepName::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    #[default]
    RuleBased,
    Llm,
}

/// Fill strategy for numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericStrategy {
    Mean,
    Median,
    Constant,
}

/// Fill strategy for categorical/text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalStrategy {
    Mode,
    Constant,
}

/// Fill strategy for datetime columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatetimeStrategy {
    Ffill,
    Bfill,
}

/// Outlier bound computation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    #[default]
    Iqr,
    /// Bounds at fixed lower/upper quantiles (0.01 and 0.99).
    Quantile,
    Zscore,
    None,
}

/// What to do with values outside the outlier bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierAction {
    #[default]
    Clip,
    Remove,
    None,
}

/// Constant fill value for the `constant` imputation strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for FillValue {
    fn default() -> Self {
        FillValue::Int(0)
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Bool(v) => write!(f, "{v}"),
            FillValue::Int(v) => write!(f, "{v}"),
            FillValue::Float(v) => write!(f, "{v}"),
            FillValue::Text(v) => f.write_str(v),
        }
    }
}

impl FillValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FillValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            FillValue::Int(v) => Some(*v as f64),
            FillValue::Float(v) => Some(*v),
            FillValue::Text(v) => v.trim().parse::<f64>().ok(),
        }
    }
}

/// Tunable parameters for the deterministic pipeline logic.
///
/// Every field has a documented default; the sanitizer enforces the valid
/// ranges (out-of-range values reset to the default rather than clipping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    /// Drop columns whose missing fraction exceeds this. Range [0.10, 0.90].
    pub missing_threshold: f64,
    /// Drop rows whose missing fraction reaches this. Range [0.50, 0.99].
    pub row_missing_threshold: f64,
    /// Whether the row-drop half of `drop_rules` applies at all.
    pub drop_rows: bool,
    /// Columns excluded from the per-row missingness computation.
    pub ignore_columns_for_row_drop: Vec<String>,

    /// Minimum parse-success ratio for datetime inference. Range [0.50, 0.99].
    pub datetime_success_ratio: f64,

    /// Mirror of `enabled_steps.impute_missing`; the step flag wins.
    pub impute: bool,
    pub numeric_strategy: Option<NumericStrategy>,
    pub categorical_strategy: Option<CategoricalStrategy>,
    pub datetime_strategy: Option<DatetimeStrategy>,
    pub fill_value: FillValue,
    /// Numeric columns with at most this many distinct values are imputed
    /// with the categorical strategy (they are codes, not measurements).
    /// Range [2, 10000].
    pub categorical_numeric_max_unique: u32,

    pub outliers_method: OutlierMethod,
    pub outliers_action: OutlierAction,
    /// IQR multiplier for outlier bounds. Range [0.5, 10.0].
    pub iqr_k: f64,
    /// Z-score cutoff when `outliers_method` is `zscore`. Range [2.0, 10.0].
    pub zscore_threshold: f64,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            missing_threshold: 0.5,
            row_missing_threshold: 0.80,
            drop_rows: true,
            ignore_columns_for_row_drop: Vec::new(),
            datetime_success_ratio: 0.8,
            impute: true,
            numeric_strategy: Some(NumericStrategy::Mean),
            categorical_strategy: Some(CategoricalStrategy::Mode),
            datetime_strategy: None,
            fill_value: FillValue::default(),
            categorical_numeric_max_unique: 20,
            outliers_method: OutlierMethod::Iqr,
            outliers_action: OutlierAction::Clip,
            iqr_k: 1.5,
            zscore_threshold: 3.0,
        }
    }
}

/// A structured, testable plan for running the cleaning pipeline.
///
/// - `enabled_steps`: which pipeline steps run. A step absent from the map
///   counts as enabled, for forward compatibility with older plans.
/// - `params`: thresholds and strategies for the deterministic step logic.
/// - `notes`: human-readable rationale. Informational only.
/// - `source`: where the plan came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub version: u32,
    pub source: PlanSource,
    pub enabled_steps: BTreeMap<StepName, bool>,
    pub params: PlanParams,
    pub notes: Vec<String>,
}

impl CleaningPlan {
    /// The canonical safe plan: every step enabled, default parameters.
    pub fn default_plan() -> Self {
        let enabled_steps = StepName::ALL.into_iter().map(|s| (s, true)).collect();
        Self {
            version: PLAN_VERSION,
            source: PlanSource::RuleBased,
            enabled_steps,
            params: PlanParams::default(),
            notes: Vec::new(),
        }
    }

    /// Whether a step should run. Missing keys default to enabled.
    pub fn is_enabled(&self, step: StepName) -> bool {
        self.enabled_steps.get(&step).copied().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_name_round_trip() {
        for step in StepName::ALL {
            assert_eq!(StepName::parse(step.as_str()), Some(step));
        }
        assert_eq!(StepName::parse("reticulate_splines"), None);
    }

    #[test]
    fn default_plan_enables_everything() {
        let plan = CleaningPlan::default_plan();
        assert_eq!(plan.enabled_steps.len(), StepName::ALL.len());
        for step in StepName::ALL {
            assert!(plan.is_enabled(step));
        }
        assert_eq!(plan.source, PlanSource::RuleBased);
        assert_eq!(plan.version, PLAN_VERSION);
    }

    #[test]
    fn missing_step_key_counts_as_enabled() {
        let mut plan = CleaningPlan::default_plan();
        plan.enabled_steps.remove(&StepName::Outliers);
        assert!(plan.is_enabled(StepName::Outliers));
    }
}
