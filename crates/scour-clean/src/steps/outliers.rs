//! Outlier clipping and removal for numeric columns.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{
    BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, PlSmallStr, Series,
};
use scour_model::{ClipBounds, OutlierAction, OutlierMethod, OutliersReport, PlanParams};
use scour_profile::is_integer_dtype;
use scour_profile::stats::quantile_sorted;
use tracing::debug;

use crate::error::Result;
use crate::frame::{numeric_column_names, numeric_values};

/// Default row floor below which outlier handling is skipped entirely.
pub const DEFAULT_MIN_ROWS: usize = 30;

/// Distinct ratio at which a numeric column reads as an identifier.
const NEAR_UNIQUE_RATIO: f64 = 0.98;

/// Quantile bounds for [`OutlierMethod::Quantile`].
const QUANTILE_LO: f64 = 0.01;
const QUANTILE_HI: f64 = 0.99;

pub fn outliers(
    df: DataFrame,
    enabled: bool,
    params: &PlanParams,
    min_rows: usize,
) -> Result<(DataFrame, OutliersReport)> {
    if !enabled {
        return Ok((df, OutliersReport::default()));
    }
    let mut report = OutliersReport {
        enabled: true,
        method: Some(params.outliers_method),
        action: Some(params.outliers_action),
        ..OutliersReport::default()
    };
    if params.outliers_method == OutlierMethod::None
        || params.outliers_action == OutlierAction::None
        || df.height() < min_rows
    {
        return Ok((df, report));
    }

    let mut df = df;
    let mut bounds: BTreeMap<String, ClipBounds> = BTreeMap::new();
    for name in numeric_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let series = col.as_materialized_series();
        let is_int = is_integer_dtype(series.dtype());
        let Ok(values) = numeric_values(series) else {
            continue;
        };
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.len() < 2 {
            continue;
        }
        // Identifier columns are mostly distinct by construction; clipping
        // them would destroy data without removing any noise.
        let distinct: BTreeSet<u64> = present.iter().map(|v| v.to_bits()).collect();
        if distinct.len() as f64 / present.len() as f64 >= NEAR_UNIQUE_RATIO {
            continue;
        }
        let Some((mut lo, mut hi)) = compute_bounds(&present, params) else {
            continue;
        };
        if is_int {
            lo = lo.floor();
            hi = hi.ceil();
        }
        let outside = present.iter().any(|v| *v < lo || *v > hi);
        if !outside {
            continue;
        }
        bounds.insert(name.clone(), ClipBounds { lo, hi });
    }

    match params.outliers_action {
        OutlierAction::Clip => {
            for (name, b) in &bounds {
                let Ok(col) = df.column(name) else { continue };
                let series = col.as_materialized_series();
                let is_int = is_integer_dtype(series.dtype());
                let Ok(values) = numeric_values(series) else {
                    continue;
                };
                let clipped = values.into_iter().map(|v| v.map(|x| x.clamp(b.lo, b.hi)));
                let new_series = if is_int {
                    let ints: Vec<Option<i64>> = clipped.map(|v| v.map(|x| x as i64)).collect();
                    Series::new(name.as_str().into(), ints)
                } else {
                    let floats: Vec<Option<f64>> = clipped.collect();
                    Series::new(name.as_str().into(), floats)
                };
                df.replace(name, new_series)?;
                report.columns_clipped.push(name.clone());
            }
        }
        OutlierAction::Remove => {
            let mut keep = vec![true; df.height()];
            for (name, b) in &bounds {
                let Ok(col) = df.column(name) else { continue };
                let Ok(values) = numeric_values(col.as_materialized_series()) else {
                    continue;
                };
                for (row, v) in values.iter().enumerate() {
                    if let Some(x) = v
                        && (*x < b.lo || *x > b.hi)
                    {
                        keep[row] = false;
                    }
                }
            }
            let dropped = keep.iter().filter(|k| !**k).count();
            if dropped > 0 {
                let mask = BooleanChunked::from_slice(PlSmallStr::from_static("keep"), &keep);
                df = df.filter(&mask)?;
                report.rows_removed = dropped;
            }
        }
        OutlierAction::None => {}
    }

    report.bounds = bounds;
    debug!(
        clipped = report.columns_clipped.len(),
        removed = report.rows_removed,
        "outliers finished"
    );
    Ok((df, report))
}

fn compute_bounds(present: &[f64], params: &PlanParams) -> Option<(f64, f64)> {
    match params.outliers_method {
        OutlierMethod::Iqr => {
            let mut sorted = present.to_vec();
            sorted.sort_by(f64::total_cmp);
            let q1 = quantile_sorted(&sorted, 0.25)?;
            let q3 = quantile_sorted(&sorted, 0.75)?;
            let iqr = q3 - q1;
            (iqr.is_finite() && iqr > 0.0)
                .then(|| (q1 - params.iqr_k * iqr, q3 + params.iqr_k * iqr))
        }
        OutlierMethod::Quantile => {
            let mut sorted = present.to_vec();
            sorted.sort_by(f64::total_cmp);
            let lo = quantile_sorted(&sorted, QUANTILE_LO)?;
            let hi = quantile_sorted(&sorted, QUANTILE_HI)?;
            (lo.is_finite() && hi.is_finite() && lo < hi).then_some((lo, hi))
        }
        OutlierMethod::Zscore => {
            let n = present.len() as f64;
            let mean = present.iter().sum::<f64>() / n;
            let var = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            (std.is_finite() && std > 0.0).then(|| {
                (
                    mean - params.zscore_threshold * std,
                    mean + params.zscore_threshold * std,
                )
            })
        }
        OutlierMethod::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    fn iqr_params() -> PlanParams {
        PlanParams::default()
    }

    #[test]
    fn iqr_bound_computation() {
        let bounds = compute_bounds(&[1.0, 2.0, 3.0, 4.0, 100.0], &iqr_params());
        assert_eq!(bounds, Some((-1.0, 7.0)));
    }

    #[test]
    fn iqr_clip_caps_the_outlier() {
        let frame = df! {
            "x" => [1.0f64, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 100.0, 100.0],
        }
        .unwrap();
        let (out, report) = outliers(frame, true, &iqr_params(), 5).unwrap();
        assert_eq!(report.columns_clipped, vec!["x"]);
        let b = &report.bounds["x"];
        assert_eq!(b.lo, -1.0);
        assert_eq!(b.hi, 7.0);
        let vals: Vec<f64> = out
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(vals, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 7.0, 7.0]);
    }

    #[test]
    fn row_floor_skips_small_tables() {
        let frame = df! { "x" => [1.0f64, 1.0, 2.0, 3.0, 100.0] }.unwrap();
        let (out, report) = outliers(frame, true, &iqr_params(), DEFAULT_MIN_ROWS).unwrap();
        assert!(report.columns_clipped.is_empty());
        let vals: Vec<f64> = out
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(vals[4], 100.0);
    }

    #[test]
    fn remove_drops_outlier_rows() {
        let mut params = iqr_params();
        params.outliers_action = OutlierAction::Remove;
        let frame = df! {
            "x" => [1.0f64, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 100.0],
            "tag" => ["a", "b", "c", "d", "e", "f", "g", "h", "i"],
        }
        .unwrap();
        let (out, report) = outliers(frame, true, &params, 5).unwrap();
        assert_eq!(report.rows_removed, 1);
        assert_eq!(out.height(), 8);
    }

    #[test]
    fn integer_bounds_are_rounded() {
        let vals: Vec<i64> = vec![10, 11, 10, 12, 11, 10, 12, 11, 10, 50];
        let frame = df! { "x" => vals }.unwrap();
        let (out, report) = outliers(frame, true, &iqr_params(), 5).unwrap();
        assert_eq!(report.columns_clipped, vec!["x"]);
        assert!(scour_profile::is_integer_dtype(
            out.column("x").unwrap().dtype()
        ));
        let b = &report.bounds["x"];
        assert_eq!(b.lo, b.lo.floor());
        assert_eq!(b.hi, b.hi.ceil());
    }

    #[test]
    fn near_unique_integer_columns_skip() {
        let ids: Vec<i64> = (0..40).collect();
        let noise: Vec<f64> = (0..40)
            .map(|i| if i == 0 { 500.0 } else { (i % 4) as f64 })
            .collect();
        let frame = df! { "user_id" => ids, "v" => noise }.unwrap();
        let (_, report) = outliers(frame, true, &iqr_params(), DEFAULT_MIN_ROWS).unwrap();
        assert!(!report.bounds.contains_key("user_id"));
        assert_eq!(report.columns_clipped, vec!["v"]);
    }

    #[test]
    fn near_unique_float_columns_skip() {
        let measurements: Vec<f64> = (0..40).map(|i| f64::from(i) * 1.013).collect();
        let frame = df! { "reading" => measurements }.unwrap();
        let (out, report) = outliers(frame, true, &iqr_params(), DEFAULT_MIN_ROWS).unwrap();
        assert!(report.bounds.is_empty());
        assert_eq!(out.column("reading").unwrap().null_count(), 0);
    }

    #[test]
    fn quantile_method() {
        let mut params = iqr_params();
        params.outliers_method = OutlierMethod::Quantile;
        let mut vals: Vec<f64> = (0..33).flat_map(|i| [f64::from(i); 3]).collect();
        vals.push(500.0);
        let frame = df! { "x" => vals }.unwrap();
        let (out, report) = outliers(frame, true, &params, DEFAULT_MIN_ROWS).unwrap();
        assert_eq!(report.columns_clipped, vec!["x"]);
        let max = out
            .column("x")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .fold(f64::MIN, f64::max);
        assert!(max < 500.0);
    }

    #[test]
    fn zscore_method() {
        let mut params = iqr_params();
        params.outliers_method = OutlierMethod::Zscore;
        let mut vals: Vec<f64> = (0..40).map(|i| 10.0 + (i % 3) as f64).collect();
        vals.push(1000.0);
        let frame = df! { "x" => vals }.unwrap();
        let (_, report) = outliers(frame, true, &params, DEFAULT_MIN_ROWS).unwrap();
        assert_eq!(report.columns_clipped, vec!["x"]);
    }
}
