//! Plan validation: raw JSON to a typed [`CleaningPlan`].
//!
//! Only the top-level shape can fail: the value must be an object and the
//! `enabled_steps`/`params`/`notes` members, when present, must be the right
//! container kind. Everything below that is coerced field by field; a bad
//! value falls back to the field default and unknown step names are dropped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use scour_model::{
    CleaningPlan, FillValue, ModelError, PLAN_VERSION, PlanParams, PlanSource, StepName,
};

/// Validate a raw JSON value as a cleaning plan.
pub fn validate(raw: &Value) -> Result<CleaningPlan, ModelError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ModelError::MalformedPlan("plan must be a JSON object".into()))?;

    let mut plan = CleaningPlan::default_plan();

    if let Some(v) = obj.get("version") {
        plan.version = v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(PLAN_VERSION);
    }
    if let Some(v) = obj.get("source") {
        plan.source = parse_enum(v).unwrap_or_default();
    }

    if let Some(steps) = obj.get("enabled_steps") {
        let steps = steps.as_object().ok_or_else(|| {
            ModelError::MalformedPlan("enabled_steps must be a JSON object".into())
        })?;
        for step in StepName::ALL {
            let enabled = steps
                .get(step.as_str())
                .and_then(Value::as_bool)
                .unwrap_or(true);
            plan.enabled_steps.insert(step, enabled);
        }
    }

    if let Some(params) = obj.get("params") {
        let params = params
            .as_object()
            .ok_or_else(|| ModelError::MalformedPlan("params must be a JSON object".into()))?;
        let defaults = PlanParams::default();
        let p = &mut plan.params;

        p.missing_threshold = f64_or(params.get("missing_threshold"), defaults.missing_threshold);
        p.row_missing_threshold = f64_or(
            params.get("row_missing_threshold"),
            defaults.row_missing_threshold,
        );
        p.drop_rows = params
            .get("drop_rows")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.drop_rows);
        p.ignore_columns_for_row_drop = string_list(params.get("ignore_columns_for_row_drop"));
        p.datetime_success_ratio = f64_or(
            params.get("datetime_success_ratio"),
            defaults.datetime_success_ratio,
        );
        p.impute = params
            .get("impute")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.impute);
        p.numeric_strategy = optional_enum(params.get("numeric_strategy"))
            .unwrap_or(defaults.numeric_strategy);
        p.categorical_strategy = optional_enum(params.get("categorical_strategy"))
            .unwrap_or(defaults.categorical_strategy);
        p.datetime_strategy = optional_enum(params.get("datetime_strategy"))
            .unwrap_or(defaults.datetime_strategy);
        if let Some(v) = params.get("fill_value") {
            p.fill_value = parse_enum::<FillValue>(v).unwrap_or_default();
        }
        p.categorical_numeric_max_unique = params
            .get("categorical_numeric_max_unique")
            .and_then(Value::as_u64)
            .map_or(defaults.categorical_numeric_max_unique, |n| {
                u32::try_from(n).unwrap_or(defaults.categorical_numeric_max_unique)
            });
        if let Some(v) = params.get("outliers_method") {
            p.outliers_method = parse_enum(v).unwrap_or(defaults.outliers_method);
        }
        if let Some(v) = params.get("outliers_action") {
            p.outliers_action = parse_enum(v).unwrap_or(defaults.outliers_action);
        }
        p.iqr_k = f64_or(params.get("iqr_k"), defaults.iqr_k);
        p.zscore_threshold = f64_or(params.get("zscore_threshold"), defaults.zscore_threshold);
    }

    if let Some(notes) = obj.get("notes") {
        let notes = notes
            .as_array()
            .ok_or_else(|| ModelError::MalformedPlan("notes must be a JSON array".into()))?;
        plan.notes = notes
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
    }

    Ok(plan)
}

fn f64_or(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(default)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an enum field; `None` on any mismatch so the caller can default.
fn parse_enum<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

/// Optional strategy fields: JSON `null` and the string `"none"` both mean
/// "explicitly off". Absent (`None` input) means "keep the default".
fn optional_enum<T: DeserializeOwned>(value: Option<&Value>) -> Option<Option<T>> {
    let value = value?;
    match value {
        Value::Null => Some(None),
        Value::String(s) if s.eq_ignore_ascii_case("none") => Some(None),
        other => Some(Some(parse_enum(other)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scour_model::NumericStrategy;
    use serde_json::json;

    #[test]
    fn top_level_shape_errors() {
        assert!(validate(&json!([1, 2])).is_err());
        assert!(validate(&json!({"enabled_steps": 3})).is_err());
        assert!(validate(&json!({"params": "x"})).is_err());
        assert!(validate(&json!({"notes": {}})).is_err());
    }

    #[test]
    fn unknown_step_names_are_dropped() {
        let plan = validate(&json!({
            "enabled_steps": {"normalize": false, "launch_rockets": true}
        }))
        .unwrap();
        assert!(!plan.is_enabled(StepName::Normalize));
        assert_eq!(plan.enabled_steps.len(), StepName::ALL.len());
    }

    #[test]
    fn missing_step_defaults_to_enabled() {
        let plan = validate(&json!({"enabled_steps": {}})).unwrap();
        assert!(plan.is_enabled(StepName::Deduplicate));
    }

    #[test]
    fn bad_values_coerce_to_defaults() {
        let plan = validate(&json!({
            "version": "two",
            "source": "oracle",
            "params": {
                "missing_threshold": "lots",
                "numeric_strategy": "vibes",
                "iqr_k": 2.5
            }
        }))
        .unwrap();
        assert_eq!(plan.version, PLAN_VERSION);
        assert_eq!(plan.source, PlanSource::RuleBased);
        assert_eq!(plan.params.missing_threshold, 0.5);
        assert_eq!(plan.params.numeric_strategy, Some(NumericStrategy::Mean));
        assert_eq!(plan.params.iqr_k, 2.5);
    }

    #[test]
    fn out_of_range_version_coerces_to_default() {
        let plan = validate(&json!({"version": u64::from(u32::MAX) + 1})).unwrap();
        assert_eq!(plan.version, PLAN_VERSION);
    }

    #[test]
    fn none_string_disables_strategy() {
        let plan = validate(&json!({
            "params": {"numeric_strategy": "none", "categorical_strategy": null}
        }))
        .unwrap();
        assert_eq!(plan.params.numeric_strategy, None);
        assert_eq!(plan.params.categorical_strategy, None);
    }

    #[test]
    fn notes_keep_only_strings() {
        let plan = validate(&json!({"notes": ["a", 1, "b", null]})).unwrap();
        assert_eq!(plan.notes, vec!["a", "b"]);
    }
}
