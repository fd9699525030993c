use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::{info, warn};

use scour_clean::{run_pipeline, run_pipeline_with_plan};
use scour_model::{RunOptions, RunReport, StepName};
use scour_plan::{sanitize, validate};
use scour_profile::profile_frame;

use crate::cli::{CleanArgs, ProfileArgs};
use crate::summary::apply_table_style;

/// Everything the summary printer needs after a clean run.
pub struct CleanResult {
    pub output: PathBuf,
    pub report_path: PathBuf,
    pub report: RunReport,
}

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let df = read_csv(&args.input)?;
    let options = RunOptions {
        use_llm: args.use_llm,
        llm_model: args.llm_model.clone(),
        impute: if args.no_impute { Some(false) } else { None },
        ..RunOptions::new()
    };
    if args.use_llm {
        warn!("no advisor client is configured; the rule-based plan will be used");
    }

    let start = Instant::now();
    let (mut cleaned, report) = match &args.plan {
        Some(path) => {
            let plan = load_plan(path)?;
            run_pipeline_with_plan(df, plan, &options)
        }
        None => run_pipeline(df, &options, None),
    }
    .with_context(|| format!("clean {}", args.input.display()))?;
    info!(
        rows_before = report.rows_before,
        rows_after = report.rows_after,
        cols_before = report.cols_before,
        cols_after = report.cols_after,
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("cleaned.csv"));
    let report_path = args
        .report
        .clone()
        .unwrap_or_else(|| args.input.with_extension("report.json"));

    write_csv(&output, &mut cleaned)?;
    let json = serde_json::to_string_pretty(&report).context("serialize run report")?;
    fs::write(&report_path, json + "\n")
        .with_context(|| format!("write {}", report_path.display()))?;

    Ok(CleanResult {
        output,
        report_path,
        report,
    })
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let df = read_csv(&args.input)?;
    let profile = profile_frame(&df, &RunOptions::new().profile);
    let json = serde_json::to_string_pretty(&profile).context("serialize profile")?;
    println!("{json}");
    Ok(())
}

pub fn run_steps() {
    let mut table = Table::new();
    table.set_header(vec!["#", "Step", "What it does"]);
    apply_table_style(&mut table);
    for (index, step) in StepName::ALL.into_iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            step.as_str().to_string(),
            step_description(step).to_string(),
        ]);
    }
    println!("{table}");
}

fn step_description(step: StepName) -> &'static str {
    match step {
        StepName::Normalize => "Rename columns to snake_case identifiers",
        StepName::TrimStrings => "Trim and collapse whitespace in text cells",
        StepName::StandardizeMissing => "Replace missing-value markers with nulls",
        StepName::CastTypes => "Parse money, percent, boolean and numeric text",
        StepName::EncodeBooleans => "Encode two-token text columns as booleans",
        StepName::DropRules => "Drop empty, constant and mostly-missing data",
        StepName::DatetimeInference => "Parse text columns that hold timestamps",
        StepName::Deduplicate => "Drop duplicate rows",
        StepName::Outliers => "Clip or remove numeric outliers",
        StepName::ImputeMissing => "Fill remaining nulls per column kind",
    }
}

/// Reads the whole file as text columns; the pipeline owns all typing.
fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(SerReader::finish)
        .with_context(|| format!("read {}", path.display()))
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))
}

/// Load, validate and sanitize an externally produced plan file.
fn load_plan(path: &Path) -> Result<scour_model::CleaningPlan> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    let plan = validate(&value).with_context(|| format!("validate {}", path.display()))?;
    Ok(sanitize(plan))
}
