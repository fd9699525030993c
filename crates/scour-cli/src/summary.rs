use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use scour_model::{StepName, StepReports};

use crate::commands::CleanResult;

pub fn print_summary(result: &CleanResult) {
    let report = &result.report;
    println!("Cleaned: {}", result.output.display());
    println!("Report:  {}", result.report_path.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Enabled"),
        header_cell("Outcome"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for step in StepName::ALL {
        let (enabled, outcome) = step_row(step, &report.steps);
        table.add_row(vec![
            Cell::new(step.as_str()),
            enabled_cell(enabled),
            Cell::new(outcome),
        ]);
    }
    println!("{table}");

    println!(
        "Rows: {} -> {}   Columns: {} -> {}",
        report.rows_before, report.rows_after, report.cols_before, report.cols_after
    );
    if !report.cleaning_plan.notes.is_empty() {
        println!("Plan notes:");
        for note in &report.cleaning_plan.notes {
            println!("- {note}");
        }
    }
}

fn step_row(step: StepName, steps: &StepReports) -> (bool, String) {
    match step {
        StepName::Normalize => {
            let r = &steps.normalize;
            (
                r.enabled,
                format!("{} renamed", count(r.renamed_columns.len(), "column")),
            )
        }
        StepName::TrimStrings => {
            let r = &steps.trim_strings;
            (
                r.enabled,
                format!("{} trimmed", count(r.columns_touched.len(), "column")),
            )
        }
        StepName::StandardizeMissing => {
            let r = &steps.standardize_missing;
            let replaced: usize = r.replaced_counts.values().sum();
            (r.enabled, format!("{} replaced", count(replaced, "marker")))
        }
        StepName::CastTypes => {
            let r = &steps.cast_types;
            let converted = r.converted_to_numeric.len() + r.parsed_boolean_columns.len();
            (
                r.enabled,
                format!("{} retyped", count(converted, "column")),
            )
        }
        StepName::EncodeBooleans => {
            let r = &steps.encode_booleans;
            (
                r.enabled,
                format!("{} encoded", count(r.columns_converted.len(), "column")),
            )
        }
        StepName::DropRules => {
            let r = &steps.drop_rules;
            let cols = r.dropped_empty_columns.len()
                + r.dropped_constant_columns.len()
                + r.dropped_high_missing_columns.len();
            (
                r.enabled,
                format!(
                    "{} and {} dropped",
                    count(cols, "column"),
                    count(r.dropped_rows_high_missing, "row")
                ),
            )
        }
        StepName::DatetimeInference => {
            let r = &steps.datetime_inference;
            (
                r.enabled,
                format!("{} parsed", count(r.inferred_columns.len(), "column")),
            )
        }
        StepName::Deduplicate => {
            let r = &steps.deduplicate;
            (
                r.enabled,
                format!("{} dropped", count(r.dropped_duplicates, "duplicate")),
            )
        }
        StepName::Outliers => {
            let r = &steps.outliers;
            (
                r.enabled,
                format!(
                    "{} clipped, {} removed",
                    count(r.columns_clipped.len(), "column"),
                    count(r.rows_removed, "row")
                ),
            )
        }
        StepName::ImputeMissing => {
            let r = &steps.impute_missing;
            if r.skipped {
                (false, "skipped by caller override".to_string())
            } else {
                (r.enabled, format!("{} filled", count(r.total_filled, "cell")))
            }
        }
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn enabled_cell(enabled: bool) -> Cell {
    if enabled {
        Cell::new("✓").fg(Color::Green)
    } else {
        Cell::new("-").fg(Color::DarkGrey)
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}
