//! Advisor prompt construction.
//!
//! The advisor sees a reduced profile, not the raw data: shape, dtype
//! groups, missingness, duplicate and candidate signals, and the ranked
//! statistics. The prompt pins the exact response schema and the valid
//! parameter ranges so the validation/sanitization pass has a fair chance.

use scour_model::{StepName, TableProfile};
use serde_json::json;

/// Render the advisor prompt for a profile.
pub fn build_prompt(profile: &TableProfile) -> String {
    let step_names: Vec<&str> = StepName::ALL.iter().map(|s| s.as_str()).collect();
    let reduced = json!({
        "n_rows": profile.n_rows,
        "n_cols": profile.n_cols,
        "dataset_type": profile.dataset_type,
        "column_groups": profile.counts,
        "dtypes": profile.dtypes,
        "overall_missing_fraction": profile.missingness.overall_fraction,
        "top_missing_columns": profile.missingness.top_missing,
        "duplicate_fraction": profile.duplicates.duplicate_fraction,
        "boolean_candidates": profile.boolean_candidates,
        "datetime_candidates": profile.datetime_candidates,
        "top_skewed_columns": profile.skewness.top_abs_skewed,
        "top_outlier_columns": profile.outliers.top_outlier_columns,
        "max_abs_correlation": profile.correlation.max_abs_corr,
        "warnings": profile.warnings,
    });

    format!(
        "You are a data-cleaning planner. Given the dataset profile below, \
respond with a single JSON object and nothing else.\n\
\n\
Response schema:\n\
{{\n\
  \"version\": 2,\n\
  \"enabled_steps\": {{<step name>: bool, ...}},\n\
  \"params\": {{\n\
    \"missing_threshold\": float in [0.10, 0.90],\n\
    \"row_missing_threshold\": float in [0.50, 0.99],\n\
    \"drop_rows\": bool,\n\
    \"ignore_columns_for_row_drop\": [string],\n\
    \"datetime_success_ratio\": float in [0.50, 0.99],\n\
    \"numeric_strategy\": \"mean\" | \"median\" | \"constant\" | \"none\",\n\
    \"categorical_strategy\": \"mode\" | \"constant\" | \"none\",\n\
    \"datetime_strategy\": \"ffill\" | \"bfill\" | \"none\",\n\
    \"fill_value\": number | string | bool,\n\
    \"categorical_numeric_max_unique\": int in [2, 10000],\n\
    \"outliers_method\": \"iqr\" | \"quantile\" | \"zscore\" | \"none\",\n\
    \"outliers_action\": \"clip\" | \"remove\" | \"none\",\n\
    \"iqr_k\": float in [0.5, 10.0],\n\
    \"zscore_threshold\": float in [2.0, 10.0]\n\
  }},\n\
  \"notes\": [string]\n\
}}\n\
\n\
Valid step names: {steps}.\n\
Out-of-range values are replaced with safe defaults.\n\
\n\
Dataset profile:\n{profile_json}\n",
        steps = step_names.join(", "),
        profile_json = serde_json::to_string_pretty(&reduced).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_every_step() {
        let prompt = build_prompt(&TableProfile::default());
        for step in StepName::ALL {
            assert!(prompt.contains(step.as_str()), "missing {}", step.as_str());
        }
        assert!(prompt.contains("\"n_rows\": 0"));
    }
}
