//! Deterministic rule-based plan builder.
//!
//! Starts from the canonical safe plan and adjusts it from profile signals.
//! Each adjustment appends a note stating what changed and why; notes are
//! informational only and never drive control flow.

use scour_model::{CleaningPlan, NumericStrategy, PlanSource, StepName, TableProfile};
use tracing::debug;

use crate::sanitize::sanitize;

/// Minimum row count before outlier handling is worth running.
const OUTLIER_MIN_ROWS: usize = 30;
/// Column count above which the column-drop threshold tightens.
const WIDE_TABLE_COLS: usize = 40;
/// Below this many columns, dropping whole rows loses too much signal.
const ROW_DROP_MIN_COLS: usize = 5;
/// Categorical column count above which the code-column ceiling widens.
const MANY_CATEGORICAL_COLS: usize = 20;

/// Build a plan from profile signals alone.
pub fn rule_based_plan(profile: &TableProfile) -> CleaningPlan {
    let mut plan = CleaningPlan::default_plan();
    plan.source = PlanSource::RuleBased;

    // Disable only when there is nothing datetime-shaped at all: no typed
    // datetime column, no time index, and no string column that parses as one.
    let no_datetime = profile.counts.datetime == 0
        && !profile.has_time_index
        && profile.datetime_candidates.is_empty();
    if no_datetime {
        plan.enabled_steps.insert(StepName::DatetimeInference, false);
        plan.notes
            .push("datetime_inference disabled: no datetime columns or parseable candidates".into());
    }

    if profile.missingness.overall_fraction <= 0.0 {
        plan.enabled_steps.insert(StepName::ImputeMissing, false);
        plan.notes
            .push("impute_missing disabled: table has no missing values".into());
    }

    let run_outliers = profile.counts.numeric >= 1 && profile.n_rows >= OUTLIER_MIN_ROWS;
    if !run_outliers {
        plan.enabled_steps.insert(StepName::Outliers, false);
        plan.notes.push(format!(
            "outliers disabled: {} numeric columns, {} rows (need at least 1 and {OUTLIER_MIN_ROWS})",
            profile.counts.numeric, profile.n_rows
        ));
    }

    if profile.n_cols >= WIDE_TABLE_COLS {
        plan.params.missing_threshold = 0.4;
        plan.notes.push(format!(
            "missing_threshold tightened to 0.4: wide table ({} columns)",
            profile.n_cols
        ));
    }

    if profile.n_cols < ROW_DROP_MIN_COLS {
        plan.params.drop_rows = false;
        plan.notes.push(format!(
            "row dropping disabled: narrow table ({} columns)",
            profile.n_cols
        ));
    }

    if profile.has_time_index {
        plan.params.datetime_success_ratio = 0.7;
        plan.notes
            .push("datetime_success_ratio relaxed to 0.7: table already has a time column".into());
    }

    if profile.has_skew_signal() {
        plan.params.numeric_strategy = Some(NumericStrategy::Median);
        plan.notes.push(format!(
            "numeric imputation set to median: {} skewed columns",
            profile.skewness.top_abs_skewed.len()
        ));
    }

    if profile.counts.categorical > MANY_CATEGORICAL_COLS {
        plan.params.categorical_numeric_max_unique = 30;
        plan.notes.push(format!(
            "categorical_numeric_max_unique raised to 30: {} categorical columns",
            profile.counts.categorical
        ));
    }

    debug!(notes = plan.notes.len(), "built rule-based plan");
    sanitize(plan)
}
