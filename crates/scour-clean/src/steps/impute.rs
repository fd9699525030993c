//! Missing-value imputation.
//!
//! Strategies are chosen per type family, with one twist: a numeric column
//! whose distinct count is at or below `categorical_numeric_max_unique` is
//! a code column and gets the categorical strategy. That reclassification
//! happens per column at fill time; a table can mix true measurements and
//! coded numerics.
//!
//! A column whose fill source cannot be computed (mean of an all-missing
//! column, a non-numeric constant for a numeric column, a disabled
//! strategy) is recorded in `unfilled_columns` instead of being silently
//! left behind.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use scour_model::{
    CategoricalStrategy, DatetimeStrategy, DtypeChange, FillValue, ImputeReport, NumericStrategy,
    PlanParams,
};
use scour_profile::{is_datetime_dtype, is_integer_dtype, is_numeric_dtype};
use tracing::debug;

use crate::error::Result;
use crate::frame::{numeric_values, string_values};

pub fn impute_missing(
    df: DataFrame,
    enabled: bool,
    params: &PlanParams,
) -> Result<(DataFrame, ImputeReport)> {
    if !enabled {
        return Ok((df, ImputeReport::default()));
    }
    let mut report = ImputeReport {
        enabled: true,
        skipped: !params.impute,
        numeric_strategy: params.numeric_strategy,
        categorical_strategy: params.categorical_strategy,
        datetime_strategy: params.datetime_strategy,
        categorical_numeric_max_unique: params.categorical_numeric_max_unique,
        ..ImputeReport::default()
    };
    if report.skipped {
        return Ok((df, report));
    }

    let mut df = df;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    for name in names {
        let Ok(col) = df.column(&name) else { continue };
        if col.null_count() == 0 {
            continue;
        }
        let series = col.as_materialized_series().clone();
        let dtype = series.dtype().clone();

        let outcome = if is_numeric_dtype(&dtype) {
            fill_numeric(&mut df, &name, &series, params)?
        } else if dtype == DataType::Boolean {
            fill_boolean(&mut df, &name, &series, params)?
        } else if is_datetime_dtype(&dtype) {
            fill_datetime(&mut df, &name, &series, params)?
        } else if dtype == DataType::String {
            fill_categorical(&mut df, &name, &series, params)?
        } else {
            Outcome::Unfilled
        };

        match outcome {
            Outcome::Filled {
                count,
                fill_rendered,
                categorical_numeric,
                upcast,
            } => {
                report.filled_counts.insert(name.clone(), count);
                report.total_filled += count;
                report.fill_values_used.insert(name.clone(), fill_rendered);
                if categorical_numeric {
                    report.categorical_numeric_columns.push(name.clone());
                }
                if let Some(change) = upcast {
                    report.dtype_upcasts.insert(name.clone(), change);
                }
            }
            Outcome::Partial { count, fill_rendered } => {
                report.filled_counts.insert(name.clone(), count);
                report.total_filled += count;
                report.fill_values_used.insert(name.clone(), fill_rendered);
                report.unfilled_columns.push(name.clone());
            }
            Outcome::Unfilled => report.unfilled_columns.push(name.clone()),
        }
    }

    debug!(total = report.total_filled, "impute_missing finished");
    Ok((df, report))
}

enum Outcome {
    Filled {
        count: usize,
        fill_rendered: String,
        categorical_numeric: bool,
        upcast: Option<DtypeChange>,
    },
    /// Some cells filled but nulls remain (leading ffill / trailing bfill).
    Partial { count: usize, fill_rendered: String },
    Unfilled,
}

fn fill_numeric(
    df: &mut DataFrame,
    name: &str,
    series: &Series,
    params: &PlanParams,
) -> Result<Outcome> {
    let values = numeric_values(series)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let null_count = values.len() - present.len();

    let distinct = {
        let mut bits: Vec<u64> = present.iter().map(|v| v.to_bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        bits.len()
    };
    let as_categorical = !present.is_empty()
        && distinct as u64 <= u64::from(params.categorical_numeric_max_unique);

    let fill = if as_categorical {
        match params.categorical_strategy {
            Some(CategoricalStrategy::Mode) => mode_f64(&present),
            Some(CategoricalStrategy::Constant) => params.fill_value.as_f64(),
            None => None,
        }
    } else {
        match params.numeric_strategy {
            Some(NumericStrategy::Mean) => {
                (!present.is_empty()).then(|| present.iter().sum::<f64>() / present.len() as f64)
            }
            Some(NumericStrategy::Median) => median(&present),
            Some(NumericStrategy::Constant) => params.fill_value.as_f64(),
            None => None,
        }
    };
    let Some(fill) = fill else {
        return Ok(Outcome::Unfilled);
    };

    let is_int = is_integer_dtype(series.dtype());
    let fill_is_integral = fill.fract() == 0.0 && fill.abs() < i64::MAX as f64;
    let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
    let (new_series, upcast) = if is_int && fill_is_integral {
        let ints: Vec<Option<i64>> = filled.iter().map(|v| Some(*v as i64)).collect();
        (Series::new(name.into(), ints), None)
    } else {
        let upcast = is_int.then(|| DtypeChange {
            before: series.dtype().to_string(),
            after: DataType::Float64.to_string(),
        });
        let floats: Vec<Option<f64>> = filled.into_iter().map(Some).collect();
        (Series::new(name.into(), floats), upcast)
    };
    df.replace(name, new_series)?;
    Ok(Outcome::Filled {
        count: null_count,
        fill_rendered: render_f64(fill),
        categorical_numeric: as_categorical,
        upcast,
    })
}

fn fill_boolean(
    df: &mut DataFrame,
    name: &str,
    series: &Series,
    params: &PlanParams,
) -> Result<Outcome> {
    let ca = series.bool()?;
    let values: Vec<Option<bool>> = ca.into_iter().collect();
    let present: Vec<bool> = values.iter().flatten().copied().collect();
    let fill = match params.categorical_strategy {
        Some(CategoricalStrategy::Mode) => {
            let trues = present.iter().filter(|b| **b).count();
            (!present.is_empty()).then(|| trues * 2 > present.len())
        }
        Some(CategoricalStrategy::Constant) => match &params.fill_value {
            FillValue::Bool(b) => Some(*b),
            _ => None,
        },
        None => None,
    };
    let Some(fill) = fill else {
        return Ok(Outcome::Unfilled);
    };
    let count = values.iter().filter(|v| v.is_none()).count();
    let filled: Vec<Option<bool>> = values.into_iter().map(|v| Some(v.unwrap_or(fill))).collect();
    df.replace(name, Series::new(name.into(), filled))?;
    Ok(Outcome::Filled {
        count,
        fill_rendered: fill.to_string(),
        categorical_numeric: false,
        upcast: None,
    })
}

fn fill_datetime(
    df: &mut DataFrame,
    name: &str,
    series: &Series,
    params: &PlanParams,
) -> Result<Outcome> {
    let Some(strategy) = params.datetime_strategy else {
        return Ok(Outcome::Unfilled);
    };
    let dtype = series.dtype().clone();
    let cast = series.cast(&DataType::Int64)?;
    let ca = cast.i64()?;
    let mut values: Vec<Option<i64>> = ca.into_iter().collect();
    let before_nulls = values.iter().filter(|v| v.is_none()).count();
    match strategy {
        DatetimeStrategy::Ffill => {
            let mut last = None;
            for v in values.iter_mut() {
                match v {
                    Some(x) => last = Some(*x),
                    None => *v = last,
                }
            }
        }
        DatetimeStrategy::Bfill => {
            let mut next = None;
            for v in values.iter_mut().rev() {
                match v {
                    Some(x) => next = Some(*x),
                    None => *v = next,
                }
            }
        }
    }
    let after_nulls = values.iter().filter(|v| v.is_none()).count();
    let count = before_nulls - after_nulls;
    if count == 0 {
        return Ok(Outcome::Unfilled);
    }
    let new_series = Series::new(name.into(), values).cast(&dtype)?;
    df.replace(name, new_series)?;
    let rendered = match strategy {
        DatetimeStrategy::Ffill => "ffill".to_string(),
        DatetimeStrategy::Bfill => "bfill".to_string(),
    };
    if after_nulls > 0 {
        Ok(Outcome::Partial {
            count,
            fill_rendered: rendered,
        })
    } else {
        Ok(Outcome::Filled {
            count,
            fill_rendered: rendered,
            categorical_numeric: false,
            upcast: None,
        })
    }
}

fn fill_categorical(
    df: &mut DataFrame,
    name: &str,
    series: &Series,
    params: &PlanParams,
) -> Result<Outcome> {
    let values = string_values(series)?;
    let fill = match params.categorical_strategy {
        Some(CategoricalStrategy::Mode) => mode_str(&values),
        Some(CategoricalStrategy::Constant) => Some(params.fill_value.to_string()),
        None => None,
    };
    let Some(fill) = fill else {
        return Ok(Outcome::Unfilled);
    };
    let count = values.iter().filter(|v| v.is_none()).count();
    let filled: Vec<Option<String>> = values
        .into_iter()
        .map(|v| Some(v.unwrap_or_else(|| fill.clone())))
        .collect();
    df.replace(name, Series::new(name.into(), filled))?;
    Ok(Outcome::Filled {
        count,
        fill_rendered: fill,
        categorical_numeric: false,
        upcast: None,
    })
}

/// Most frequent value; ties break toward the smaller value.
fn mode_f64(present: &[f64]) -> Option<f64> {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for v in present {
        *counts.entry(v.to_bits()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(bits, count)| (f64::from_bits(bits), count))
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.total_cmp(&a.0)))
        .map(|(v, _)| v)
}

/// Most frequent value; ties break lexicographically.
fn mode_str(values: &[Option<String>]) -> Option<String> {
    let mut counts: BTreeMap<&String, usize> = BTreeMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(v, _)| v.clone())
}

fn median(present: &[f64]) -> Option<f64> {
    if present.is_empty() {
        return None;
    }
    let mut sorted = present.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

fn render_f64(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{TimeUnit, df};

    fn params() -> PlanParams {
        PlanParams::default()
    }

    #[test]
    fn mean_fill_on_true_numeric() {
        // 25 distinct values keeps the column above the code-column ceiling.
        let vals: Vec<Option<f64>> = (0..25)
            .map(|i| if i == 10 { None } else { Some(i as f64 * 1.5) })
            .collect();
        let frame = df! { "x" => vals }.unwrap();
        let (out, report) = impute_missing(frame, true, &params()).unwrap();
        assert_eq!(out.column("x").unwrap().null_count(), 0);
        assert_eq!(report.filled_counts["x"], 1);
        assert!(report.categorical_numeric_columns.is_empty());
    }

    #[test]
    fn coded_numeric_uses_mode() {
        let frame = df! {
            "code" => [Some(1.0f64), Some(2.0), Some(1.0), None, Some(1.0), Some(2.0)],
        }
        .unwrap();
        let (out, report) = impute_missing(frame, true, &params()).unwrap();
        assert_eq!(report.categorical_numeric_columns, vec!["code"]);
        assert_eq!(report.fill_values_used["code"], "1");
        assert_eq!(out.column("code").unwrap().null_count(), 0);
    }

    #[test]
    fn integer_column_with_fractional_mean_upcasts() {
        let mut p = params();
        p.categorical_numeric_max_unique = 2;
        let vals: Vec<Option<i64>> = vec![Some(1), Some(2), Some(4), None];
        let frame = df! { "n" => vals }.unwrap();
        let (out, report) = impute_missing(frame, true, &p).unwrap();
        // mean of 1,2,4 = 7/3, not integral
        assert_eq!(out.column("n").unwrap().dtype(), &DataType::Float64);
        assert_eq!(report.dtype_upcasts["n"].after, DataType::Float64.to_string());
    }

    #[test]
    fn string_mode_fill() {
        let frame = df! {
            "c" => [Some("a"), Some("b"), Some("a"), None],
        }
        .unwrap();
        let (out, report) = impute_missing(frame, true, &params()).unwrap();
        assert_eq!(out.column("c").unwrap().null_count(), 0);
        assert_eq!(report.fill_values_used["c"], "a");
    }

    #[test]
    fn datetime_ffill_leaves_leading_nulls_documented() {
        let mut p = params();
        p.datetime_strategy = Some(DatetimeStrategy::Ffill);
        let raw: Vec<Option<i64>> = vec![None, Some(1_000), None, Some(3_000)];
        let series = Series::new("t".into(), raw)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let frame = DataFrame::new(vec![series.into()]).unwrap();
        let (out, report) = impute_missing(frame, true, &p).unwrap();
        assert_eq!(out.column("t").unwrap().null_count(), 1);
        assert_eq!(report.filled_counts["t"], 1);
        assert_eq!(report.unfilled_columns, vec!["t"]);
    }

    #[test]
    fn disabled_strategy_records_unfilled() {
        let mut p = params();
        p.numeric_strategy = None;
        p.categorical_numeric_max_unique = 2;
        let vals: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), None];
        let frame = df! { "x" => vals }.unwrap();
        let (out, report) = impute_missing(frame, true, &p).unwrap();
        assert_eq!(out.column("x").unwrap().null_count(), 1);
        assert_eq!(report.unfilled_columns, vec!["x"]);
    }

    #[test]
    fn impute_flag_off_skips() {
        let mut p = params();
        p.impute = false;
        let frame = df! { "x" => [Some(1.0f64), None] }.unwrap();
        let (out, report) = impute_missing(frame, true, &p).unwrap();
        assert!(report.skipped);
        assert_eq!(out.column("x").unwrap().null_count(), 1);
    }

    #[test]
    fn all_missing_column_is_unfilled() {
        let vals: Vec<Option<f64>> = vec![None, None, None];
        let frame = df! { "x" => vals }.unwrap();
        let (out, report) = impute_missing(frame, true, &params()).unwrap();
        assert_eq!(out.column("x").unwrap().null_count(), 3);
        assert_eq!(report.unfilled_columns, vec!["x"]);
    }

    #[test]
    fn boolean_mode_fill() {
        let frame = df! {
            "b" => [Some(true), Some(true), Some(false), None],
        }
        .unwrap();
        let (out, report) = impute_missing(frame, true, &params()).unwrap();
        assert_eq!(out.column("b").unwrap().null_count(), 0);
        assert_eq!(report.fill_values_used["b"], "true");
    }
}
