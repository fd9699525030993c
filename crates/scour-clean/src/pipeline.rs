//! Pipeline orchestration.
//!
//! Runs the fixed step order against a table, with a full profile taken
//! before the first step and after the last. The order matters: later
//! steps assume earlier normalization (booleans are encoded after missing
//! tokens are gone, outliers run on the deduplicated table, imputation
//! runs last so it sees final dtypes and the reduced row/column set).

use polars::prelude::DataFrame;
use scour_model::{CleaningPlan, RunOptions, RunReport, StepName, StepReports, TableProfile};
use scour_plan::{LlmClient, build_plan};
use scour_profile::profile_frame;
use tracing::info;

use crate::diff::{dtype_changes, missing_changes};
use crate::error::Result;
use crate::steps::booleans::encode_booleans;
use crate::steps::cast::cast_types;
use crate::steps::datetime::datetime_inference;
use crate::steps::dedupe::{DedupOptions, deduplicate};
use crate::steps::drop_rules::drop_rules;
use crate::steps::impute::impute_missing;
use crate::steps::missing::standardize_missing;
use crate::steps::normalize::normalize;
use crate::steps::outliers::{DEFAULT_MIN_ROWS, outliers};
use crate::steps::trim::trim_strings;

/// Clean a table end to end: profile, plan, execute, report.
pub fn run_pipeline(
    df: DataFrame,
    options: &RunOptions,
    client: Option<&dyn LlmClient>,
) -> Result<(DataFrame, RunReport)> {
    let pre_profile = profile_frame(&df, &options.profile);
    let mut plan = build_plan(&pre_profile, options.use_llm, client);
    apply_caller_override(&mut plan, options);
    execute(df, plan, pre_profile, options)
}

/// Clean a table with a caller-supplied plan (already validated and
/// sanitized). The caller override still applies on top of it.
pub fn run_pipeline_with_plan(
    df: DataFrame,
    mut plan: CleaningPlan,
    options: &RunOptions,
) -> Result<(DataFrame, RunReport)> {
    let pre_profile = profile_frame(&df, &options.profile);
    apply_caller_override(&mut plan, options);
    execute(df, plan, pre_profile, options)
}

/// The caller can force imputation off; it can never re-enable a step the
/// plan disabled.
fn apply_caller_override(plan: &mut CleaningPlan, options: &RunOptions) {
    if options.impute == Some(false) && plan.is_enabled(StepName::ImputeMissing) {
        plan.enabled_steps.insert(StepName::ImputeMissing, false);
        plan.params.impute = false;
        plan.notes
            .push("imputation disabled by caller override".into());
    }
}

fn execute(
    df: DataFrame,
    plan: CleaningPlan,
    pre_profile: TableProfile,
    options: &RunOptions,
) -> Result<(DataFrame, RunReport)> {
    let rows_before = df.height();
    let cols_before = df.width();
    let mut steps = StepReports::default();

    let (df, report) = normalize(df, plan.is_enabled(StepName::Normalize))?;
    steps.normalize = report;

    let (df, report) = trim_strings(df, plan.is_enabled(StepName::TrimStrings))?;
    steps.trim_strings = report;

    let (df, report) =
        standardize_missing(df, plan.is_enabled(StepName::StandardizeMissing), true)?;
    steps.standardize_missing = report;

    let (df, report) = cast_types(df, plan.is_enabled(StepName::CastTypes))?;
    steps.cast_types = report;

    let (df, report) = encode_booleans(df, plan.is_enabled(StepName::EncodeBooleans))?;
    steps.encode_booleans = report;

    let (df, report) = drop_rules(df, plan.is_enabled(StepName::DropRules), &plan.params)?;
    steps.drop_rules = report;

    let (df, report) = datetime_inference(
        df,
        plan.is_enabled(StepName::DatetimeInference),
        plan.params.datetime_success_ratio,
    )?;
    steps.datetime_inference = report;

    let (df, report) = deduplicate(
        df,
        plan.is_enabled(StepName::Deduplicate),
        &DedupOptions::default(),
    )?;
    steps.deduplicate = report;

    let (df, report) = outliers(
        df,
        plan.is_enabled(StepName::Outliers),
        &plan.params,
        DEFAULT_MIN_ROWS,
    )?;
    steps.outliers = report;

    let (df, report) = impute_missing(df, plan.is_enabled(StepName::ImputeMissing), &plan.params)?;
    steps.impute_missing = report;

    let post_profile = profile_frame(&df, &options.profile);
    info!(
        rows_before,
        rows_after = df.height(),
        cols_before,
        cols_after = df.width(),
        "pipeline finished"
    );

    let report = RunReport {
        dtype_changes: dtype_changes(&pre_profile, &post_profile),
        missing_changes: missing_changes(&pre_profile, &post_profile),
        rows_before,
        cols_before,
        rows_after: df.height(),
        cols_after: df.width(),
        pre_profile,
        cleaning_plan: plan,
        steps,
        post_profile,
    };
    Ok((df, report))
}
