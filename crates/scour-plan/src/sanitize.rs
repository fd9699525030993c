//! Plan sanitization.
//!
//! Always applied after validation, whichever builder produced the plan.
//! Out-of-range numeric parameters reset to their documented default rather
//! than clipping to the nearest bound: a wildly wrong threshold signals a
//! wrong plan, and the default is the safer value. Sanitization is a fixed
//! point: `sanitize(sanitize(p)) == sanitize(p)`.

use scour_model::{CleaningPlan, OutlierAction, OutlierMethod, PlanParams, StepName};
use tracing::debug;

/// Sanitize a plan in place and return it.
pub fn sanitize(mut plan: CleaningPlan) -> CleaningPlan {
    let defaults = PlanParams::default();
    let p = &mut plan.params;

    reset_out_of_range(&mut p.missing_threshold, 0.10, 0.90, defaults.missing_threshold);
    reset_out_of_range(
        &mut p.row_missing_threshold,
        0.50,
        0.99,
        defaults.row_missing_threshold,
    );
    reset_out_of_range(
        &mut p.datetime_success_ratio,
        0.50,
        0.99,
        defaults.datetime_success_ratio,
    );
    reset_out_of_range(&mut p.iqr_k, 0.5, 10.0, defaults.iqr_k);
    reset_out_of_range(&mut p.zscore_threshold, 2.0, 10.0, defaults.zscore_threshold);

    if !(2..=10_000).contains(&p.categorical_numeric_max_unique) {
        debug!(
            value = p.categorical_numeric_max_unique,
            "categorical_numeric_max_unique out of range, reset"
        );
        p.categorical_numeric_max_unique = defaults.categorical_numeric_max_unique;
    }

    // The step toggle is authoritative over the mirror flag.
    plan.params.impute = plan.is_enabled(StepName::ImputeMissing);

    // A disabled outliers step neutralizes its parameters so downstream
    // code never has to consult two flags.
    if !plan.is_enabled(StepName::Outliers) {
        plan.params.outliers_method = OutlierMethod::None;
        plan.params.outliers_action = OutlierAction::None;
    }

    plan
}

fn reset_out_of_range(value: &mut f64, lo: f64, hi: f64, default: f64) {
    if !value.is_finite() || *value < lo || *value > hi {
        debug!(value = *value, lo, hi, "plan parameter out of range, reset");
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_resets_to_default_not_bound() {
        let mut plan = CleaningPlan::default_plan();
        plan.params.missing_threshold = 0.95;
        plan.params.iqr_k = 0.0;
        plan.params.zscore_threshold = f64::NAN;
        let plan = sanitize(plan);
        assert_eq!(plan.params.missing_threshold, 0.5);
        assert_eq!(plan.params.iqr_k, 1.5);
        assert_eq!(plan.params.zscore_threshold, 3.0);
    }

    #[test]
    fn in_range_values_survive() {
        let mut plan = CleaningPlan::default_plan();
        plan.params.missing_threshold = 0.10;
        plan.params.row_missing_threshold = 0.99;
        let plan = sanitize(plan);
        assert_eq!(plan.params.missing_threshold, 0.10);
        assert_eq!(plan.params.row_missing_threshold, 0.99);
    }

    #[test]
    fn impute_mirrors_step_toggle() {
        let mut plan = CleaningPlan::default_plan();
        plan.enabled_steps.insert(StepName::ImputeMissing, false);
        plan.params.impute = true;
        let plan = sanitize(plan);
        assert!(!plan.params.impute);
    }

    #[test]
    fn disabled_outliers_neutralize_parameters() {
        let mut plan = CleaningPlan::default_plan();
        plan.enabled_steps.insert(StepName::Outliers, false);
        let plan = sanitize(plan);
        assert_eq!(plan.params.outliers_method, OutlierMethod::None);
        assert_eq!(plan.params.outliers_action, OutlierAction::None);
    }
}
