//! Column and row drop rules.
//!
//! Column phases run in a fixed order (empty, constant, high-missing)
//! because each phase evaluates against the already-reduced column set.
//! The optional row phase then drops rows whose missing fraction across
//! the considered columns reaches the row threshold.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray, PlSmallStr};
use scour_model::{DropRulesReport, PlanParams};
use tracing::debug;

use crate::error::Result;

/// Row dropping only applies to tables at least this wide.
const MIN_COLS_TO_APPLY: usize = 5;

pub fn drop_rules(
    df: DataFrame,
    enabled: bool,
    params: &PlanParams,
) -> Result<(DataFrame, DropRulesReport)> {
    if !enabled {
        return Ok((df, DropRulesReport::default()));
    }
    let mut df = df;
    let rows_before = df.height();
    let cols_before = df.width();
    let mut report = DropRulesReport {
        enabled: true,
        missing_threshold: params.missing_threshold,
        row_missing_threshold: params.row_missing_threshold,
        drop_rows: params.drop_rows,
        rows_before,
        cols_before,
        ..DropRulesReport::default()
    };

    // Phase 1: columns with no non-missing values at all.
    for name in column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        if col.null_count() == col.len() && !col.is_empty() {
            df = df.drop(&name)?;
            report.dropped_empty_columns.push(name);
        }
    }

    // Phase 2: columns with at most one distinct non-missing value.
    if df.height() > 0 {
        for name in column_names(&df) {
            let Ok(col) = df.column(&name) else { continue };
            let non_null = col.as_materialized_series().drop_nulls();
            let Ok(unique) = non_null.n_unique() else {
                continue;
            };
            if unique <= 1 {
                df = df.drop(&name)?;
                report.dropped_constant_columns.push(name);
            }
        }
    }

    // Phase 3: columns whose missing fraction exceeds the threshold.
    if df.height() > 0 {
        for name in column_names(&df) {
            let Ok(col) = df.column(&name) else { continue };
            let fraction = col.null_count() as f64 / col.len() as f64;
            if fraction > params.missing_threshold {
                df = df.drop(&name)?;
                report.dropped_high_missing_columns.push(name);
            }
        }
    }

    // Phase 4: rows, on the reduced column set.
    if params.drop_rows && df.width() >= MIN_COLS_TO_APPLY && df.height() > 0 {
        let considered: Vec<String> = column_names(&df)
            .into_iter()
            .filter(|n| !params.ignore_columns_for_row_drop.contains(n))
            .collect();
        if !considered.is_empty() {
            let mut missing_per_row = vec![0usize; df.height()];
            for name in &considered {
                let Ok(col) = df.column(name) else { continue };
                for (row, is_null) in col.as_materialized_series().is_null().into_iter().enumerate()
                {
                    if is_null.unwrap_or(false) {
                        missing_per_row[row] += 1;
                    }
                }
            }
            let keep: Vec<bool> = missing_per_row
                .iter()
                .map(|m| (*m as f64 / considered.len() as f64) < params.row_missing_threshold)
                .collect();
            let dropped = keep.iter().filter(|k| !**k).count();
            if dropped > 0 {
                let mask = BooleanChunked::from_slice(PlSmallStr::from_static("keep"), &keep);
                df = df.filter(&mask)?;
                report.dropped_rows_high_missing = dropped;
            }
        }
    }

    report.rows_after = df.height();
    report.cols_after = df.width();
    debug!(
        cols_dropped = cols_before - report.cols_after,
        rows_dropped = rows_before - report.rows_after,
        "drop_rules finished"
    );
    Ok((df, report))
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    fn params() -> PlanParams {
        PlanParams::default()
    }

    #[test]
    fn empty_and_constant_columns_drop() {
        let frame = df! {
            "a" => [None::<i64>, None, None],
            "b" => [5i64, 5, 5],
            "c" => [1i64, 2, 3],
        }
        .unwrap();
        let (out, report) = drop_rules(frame, true, &params()).unwrap();
        assert_eq!(report.dropped_empty_columns, vec!["a"]);
        assert_eq!(report.dropped_constant_columns, vec!["b"]);
        assert_eq!(out.width(), 1);
        assert_eq!(out.column("c").unwrap().len(), 3);
    }

    #[test]
    fn high_missing_column_drops() {
        let frame = df! {
            "sparse" => [Some(1i64), Some(2), None, None, None],
            "dense" => [1i64, 2, 3, 4, 5],
        }
        .unwrap();
        let (out, report) = drop_rules(frame, true, &params()).unwrap();
        assert_eq!(report.dropped_high_missing_columns, vec!["sparse"]);
        assert_eq!(out.width(), 1);
    }

    #[test]
    fn rows_drop_only_on_wide_tables() {
        // 4 columns: below the width floor, the sparse row survives.
        let frame = df! {
            "a" => [Some(1i64), Some(2), None],
            "b" => [Some(1i64), Some(2), None],
            "c" => [Some(1i64), Some(2), None],
            "d" => [Some(1i64), Some(2), None],
        }
        .unwrap();
        let (out, _) = drop_rules(frame, true, &params()).unwrap();
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn sparse_rows_drop_on_wide_tables() {
        // Columns a-d each carry two distinct values so no column phase
        // fires; the last row is 80% missing and goes.
        let frame = df! {
            "a" => [Some(1i64), Some(2), None],
            "b" => [Some(1i64), Some(2), None],
            "c" => [Some(1i64), Some(2), None],
            "d" => [Some(1i64), Some(2), None],
            "e" => [1i64, 2, 3],
        }
        .unwrap();
        let (out, report) = drop_rules(frame, true, &params()).unwrap();
        assert!(report.dropped_constant_columns.is_empty());
        assert_eq!(out.width(), 5);
        assert_eq!(out.height(), 2);
        assert_eq!(report.dropped_rows_high_missing, 1);
    }

    #[test]
    fn monotone_in_rows_and_columns() {
        let frame = df! {
            "a" => [Some(1i64), None, Some(3)],
            "b" => ["x", "y", "z"],
        }
        .unwrap();
        let (rows, cols) = (frame.height(), frame.width());
        let (out, _) = drop_rules(frame, true, &params()).unwrap();
        assert!(out.height() <= rows);
        assert!(out.width() <= cols);
    }
}
