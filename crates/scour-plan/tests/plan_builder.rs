use proptest::prelude::*;
use scour_model::{
    CleaningPlan, ColumnStat, NumericStrategy, OutlierAction, OutlierMethod, PlanSource, StepName,
    TableProfile,
};
use scour_plan::{AdvisorError, LlmClient, build_plan, build_llm_plan, rule_based_plan, sanitize};

fn profile(rows: usize, numeric: usize, categorical: usize) -> TableProfile {
    let mut p = TableProfile {
        n_rows: rows,
        n_cols: numeric + categorical,
        ..TableProfile::default()
    };
    p.counts.numeric = numeric;
    p.counts.categorical = categorical;
    for i in 0..numeric {
        p.columns.numeric.push(format!("n{i}"));
    }
    for i in 0..categorical {
        p.columns.categorical.push(format!("c{i}"));
    }
    p
}

#[test]
fn small_table_disables_outliers() {
    let plan = rule_based_plan(&profile(10, 3, 2));
    assert!(!plan.is_enabled(StepName::Outliers));
    assert_eq!(plan.params.outliers_method, OutlierMethod::None);
    assert_eq!(plan.params.outliers_action, OutlierAction::None);
    assert!(plan.notes.iter().any(|n| n.contains("outliers disabled")));
}

#[test]
fn large_numeric_table_keeps_outliers() {
    let plan = rule_based_plan(&profile(100, 3, 4));
    assert!(plan.is_enabled(StepName::Outliers));
    assert_eq!(plan.params.outliers_method, OutlierMethod::Iqr);
}

#[test]
fn no_time_signal_disables_datetime_inference() {
    let plan = rule_based_plan(&profile(100, 3, 4));
    assert!(!plan.is_enabled(StepName::DatetimeInference));
}

#[test]
fn typed_datetime_column_keeps_datetime_inference() {
    // A column already carrying a datetime dtype leaves no string candidates,
    // but the step must still run.
    let mut p = profile(100, 3, 4);
    p.counts.datetime = 1;
    let plan = rule_based_plan(&p);
    assert!(plan.is_enabled(StepName::DatetimeInference));
}

#[test]
fn time_index_relaxes_success_ratio() {
    let mut p = profile(100, 3, 4);
    p.has_time_index = true;
    p.counts.datetime = 1;
    let plan = rule_based_plan(&p);
    assert!(plan.is_enabled(StepName::DatetimeInference));
    assert_eq!(plan.params.datetime_success_ratio, 0.7);
}

#[test]
fn wide_table_tightens_missing_threshold() {
    let plan = rule_based_plan(&profile(100, 30, 15));
    assert_eq!(plan.params.missing_threshold, 0.4);

    let plan = rule_based_plan(&profile(100, 5, 5));
    assert_eq!(plan.params.missing_threshold, 0.5);
}

#[test]
fn narrow_table_disables_row_drop() {
    let plan = rule_based_plan(&profile(100, 2, 2));
    assert!(!plan.params.drop_rows);

    let plan = rule_based_plan(&profile(100, 3, 3));
    assert!(plan.params.drop_rows);
}

#[test]
fn no_missingness_disables_imputation() {
    let clean = rule_based_plan(&profile(100, 3, 4));
    assert!(!clean.is_enabled(StepName::ImputeMissing));
    assert!(!clean.params.impute);

    let mut p = profile(100, 3, 4);
    p.missingness.overall_fraction = 0.01;
    let dirty = rule_based_plan(&p);
    assert!(dirty.is_enabled(StepName::ImputeMissing));
    assert!(dirty.params.impute);
}

#[test]
fn skew_signal_switches_to_median() {
    let mut p = profile(100, 3, 2);
    p.skewness.top_abs_skewed.push(ColumnStat {
        column: "n0".into(),
        value: 4.2,
    });
    let plan = rule_based_plan(&p);
    assert_eq!(plan.params.numeric_strategy, Some(NumericStrategy::Median));
}

#[test]
fn many_categorical_columns_widen_code_ceiling() {
    let plan = rule_based_plan(&profile(100, 3, 25));
    assert_eq!(plan.params.categorical_numeric_max_unique, 30);
}

struct FailingClient;

impl LlmClient for FailingClient {
    fn complete(&self, _prompt: &str) -> Result<String, AdvisorError> {
        Err(AdvisorError::Unavailable("connection refused".into()))
    }
}

struct CannedClient(&'static str);

impl LlmClient for CannedClient {
    fn complete(&self, _prompt: &str) -> Result<String, AdvisorError> {
        Ok(self.0.to_string())
    }
}

#[test]
fn failing_advisor_falls_back_to_rule_based() {
    let plan = build_plan(&profile(100, 3, 4), true, Some(&FailingClient));
    assert_eq!(plan.source, PlanSource::RuleBased);
    assert!(
        plan.notes
            .iter()
            .any(|n| n.contains("unavailable") && n.contains("connection refused"))
    );
}

#[test]
fn advisor_disabled_returns_rule_based_unmodified() {
    let p = profile(100, 3, 4);
    let plan = build_plan(&p, false, Some(&FailingClient));
    assert_eq!(plan, rule_based_plan(&p));
}

#[test]
fn missing_client_notes_the_gap() {
    let plan = build_plan(&profile(100, 3, 4), true, None);
    assert_eq!(plan.source, PlanSource::RuleBased);
    assert!(plan.notes.iter().any(|n| n.contains("no client")));
}

#[test]
fn prose_wrapped_advisor_json_is_accepted() {
    let client = CannedClient(
        "Sure! Here is the plan:\n```json\n{\"version\": 2, \
         \"enabled_steps\": {\"outliers\": false}, \
         \"params\": {\"missing_threshold\": 0.3}, \"notes\": [\"keep it simple\"]}\n```",
    );
    let plan = build_llm_plan(&profile(100, 3, 4), &client).unwrap();
    assert_eq!(plan.source, PlanSource::Llm);
    assert!(!plan.is_enabled(StepName::Outliers));
    // Sanitization neutralizes outlier params for the disabled step.
    assert_eq!(plan.params.outliers_method, OutlierMethod::None);
    assert_eq!(plan.params.missing_threshold, 0.3);
}

#[test]
fn garbage_advisor_response_is_an_extraction_error() {
    let err = build_llm_plan(&profile(100, 3, 4), &CannedClient("no json here")).unwrap_err();
    assert!(matches!(err, AdvisorError::Extraction(_)));
}

#[test]
fn wrong_shape_is_a_schema_error() {
    let err = build_llm_plan(&profile(100, 3, 4), &CannedClient("[1, 2, 3]")).unwrap_err();
    assert!(matches!(err, AdvisorError::Schema(_)));
}

proptest! {
    // Sanitization is a fixed point whatever the incoming parameters.
    #[test]
    fn sanitize_is_idempotent(
        missing in -1.0f64..2.0,
        row_missing in -1.0f64..2.0,
        ratio in -1.0f64..2.0,
        iqr_k in -5.0f64..20.0,
        zscore in -5.0f64..20.0,
        max_unique in 0u32..20_000,
        outliers_on in any::<bool>(),
        impute_on in any::<bool>(),
    ) {
        let mut plan = CleaningPlan::default_plan();
        plan.params.missing_threshold = missing;
        plan.params.row_missing_threshold = row_missing;
        plan.params.datetime_success_ratio = ratio;
        plan.params.iqr_k = iqr_k;
        plan.params.zscore_threshold = zscore;
        plan.params.categorical_numeric_max_unique = max_unique;
        plan.enabled_steps.insert(StepName::Outliers, outliers_on);
        plan.enabled_steps.insert(StepName::ImputeMissing, impute_on);

        let once = sanitize(plan);
        let twice = sanitize(once.clone());
        prop_assert_eq!(once, twice);
    }

    // Sanitized parameters always land in their documented ranges.
    #[test]
    fn sanitized_parameters_are_in_range(
        missing in -1.0f64..2.0,
        iqr_k in -5.0f64..20.0,
    ) {
        let mut plan = CleaningPlan::default_plan();
        plan.params.missing_threshold = missing;
        plan.params.iqr_k = iqr_k;
        let plan = sanitize(plan);
        prop_assert!((0.10..=0.90).contains(&plan.params.missing_threshold));
        prop_assert!((0.5..=10.0).contains(&plan.params.iqr_k));
    }
}
