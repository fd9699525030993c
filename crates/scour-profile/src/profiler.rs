//! Table profiling.
//!
//! `profile_frame` walks a `DataFrame` once per signal family and builds a
//! [`TableProfile`]. Profiling is best-effort by design: a column whose
//! statistic cannot be computed (cast failure, too few rows, zero variance)
//! is skipped for that signal rather than failing the whole profile.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{AnyValue, DataFrame, DataType, Series};
use scour_model::{
    BooleanCandidate, CardinalityEntry, ColumnFraction, ColumnGroups, ColumnStat, CorrelationPair,
    CorrelationSignals, DatasetType, DatetimeCandidate, DuplicateStats, GroupCounts, Missingness,
    OutlierSignal, OutlierSignals, ProfileOptions, SkewnessSignals, StringQuality, TableProfile,
};
use tracing::debug;

use crate::kind::{ColumnKind, column_kind};
use crate::parse::{letters_ratio, parse_datetime};
use crate::stats::{pearson, quantile_sorted, sample_skewness};
use crate::tokens::{is_boolean_value_set, is_missing_marker};
use crate::values::any_to_key;

/// Absolute skewness above which a column counts as materially skewed.
const SKEW_SIGNAL_THRESHOLD: f64 = 1.0;

/// Separator for row composites in duplicate detection. A control character
/// keeps `("a,b", "c")` and `("a", "b,c")` distinct.
const ROW_JOIN: char = '\u{1f}';

/// Profile a table.
pub fn profile_frame(df: &DataFrame, opts: &ProfileOptions) -> TableProfile {
    let n_rows = df.height();
    let n_cols = df.width();
    let memory_bytes = df.estimated_size();

    let mut dtypes = BTreeMap::new();
    let mut columns = ColumnGroups::default();
    for col in df.get_columns() {
        let name = col.name().to_string();
        let dtype = col.dtype();
        dtypes.insert(name.clone(), dtype.to_string());
        match column_kind(dtype) {
            ColumnKind::Numeric => columns.numeric.push(name),
            ColumnKind::Boolean => columns.boolean.push(name),
            ColumnKind::Datetime => columns.datetime.push(name),
            ColumnKind::Categorical => columns.categorical.push(name),
            ColumnKind::Other => {}
        }
    }
    let counts = GroupCounts {
        datetime: columns.datetime.len(),
        numeric: columns.numeric.len(),
        boolean: columns.boolean.len(),
        categorical: columns.categorical.len(),
    };

    let time_column = columns.datetime.first().cloned();
    let has_time_index = time_column.is_some();
    let dataset_type = if counts.datetime > 0 && counts.numeric > 0 {
        DatasetType::TimeSeries
    } else if counts.datetime == 0 {
        DatasetType::Tabular
    } else {
        DatasetType::Mixed
    };

    let missingness = missingness_signals(df, opts);
    let (categorical_cardinality, warnings) = cardinality_signals(df, &columns.categorical, opts);
    let duplicates = duplicate_signals(df);
    let string_quality = string_quality_signals(df, &columns.categorical, opts);
    let boolean_candidates = boolean_candidate_signals(df, &columns.categorical, opts);
    let datetime_candidates = datetime_candidate_signals(df, &columns.categorical, opts);
    let skewness = skewness_signals(df, &columns.numeric, opts);
    let outliers = outlier_signals(df, &columns.numeric, opts);
    let correlation = correlation_signals(df, &columns.numeric, opts);

    debug!(
        rows = n_rows,
        cols = n_cols,
        dataset_type = ?dataset_type,
        "profiled table"
    );

    TableProfile {
        n_rows,
        n_cols,
        memory_bytes,
        memory_mb: memory_bytes as f64 / (1024.0 * 1024.0),
        dtypes,
        columns,
        counts,
        has_time_index,
        time_column,
        dataset_type,
        missingness,
        categorical_cardinality,
        warnings,
        duplicates,
        string_quality,
        boolean_candidates,
        datetime_candidates,
        skewness,
        outliers,
        correlation,
    }
}

fn missingness_signals(df: &DataFrame, opts: &ProfileOptions) -> Missingness {
    let height = df.height();
    let mut per_column = BTreeMap::new();
    let mut fractions = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let fraction = if height == 0 {
            0.0
        } else {
            col.null_count() as f64 / height as f64
        };
        per_column.insert(col.name().to_string(), fraction);
        fractions.push((col.name().to_string(), fraction));
    }
    let overall_fraction = if fractions.is_empty() {
        0.0
    } else {
        fractions.iter().map(|(_, f)| f).sum::<f64>() / fractions.len() as f64
    };
    let mut ranked: Vec<(String, f64)> = fractions.into_iter().filter(|(_, f)| *f > 0.0).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top_missing = ranked
        .into_iter()
        .take(opts.top_k)
        .map(|(column, fraction)| ColumnFraction { column, fraction })
        .collect();
    Missingness {
        overall_fraction,
        per_column,
        top_missing,
    }
}

fn cardinality_signals(
    df: &DataFrame,
    categorical: &[String],
    opts: &ProfileOptions,
) -> (Vec<CardinalityEntry>, Vec<String>) {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    for name in categorical {
        let Ok(col) = df.column(name) else { continue };
        let series = col.as_materialized_series().drop_nulls();
        let Ok(unique_values) = series.n_unique() else {
            continue;
        };
        if unique_values > opts.max_categories {
            warnings.push(format!(
                "column '{name}' has {unique_values} distinct values (ceiling {})",
                opts.max_categories
            ));
        }
        entries.push(CardinalityEntry {
            column: name.clone(),
            unique_values,
        });
    }
    entries.sort_by(|a, b| b.unique_values.cmp(&a.unique_values));
    (entries, warnings)
}

fn duplicate_signals(df: &DataFrame) -> DuplicateStats {
    let height = df.height();
    if height == 0 || df.width() == 0 {
        return DuplicateStats::default();
    }
    let cols = df.get_columns();
    let mut seen = BTreeSet::new();
    for row in 0..height {
        let mut composite = String::new();
        for col in cols {
            let value = col.get(row).unwrap_or(AnyValue::Null);
            composite.push_str(&any_to_key(&value));
            composite.push(ROW_JOIN);
        }
        seen.insert(composite);
    }
    let duplicate_rows = height - seen.len();
    DuplicateStats {
        duplicate_rows,
        duplicate_fraction: duplicate_rows as f64 / height as f64,
    }
}

/// Sampled non-null text values of a column, cast to string if needed.
fn string_sample(series: &Series, limit: usize) -> Vec<String> {
    let Ok(cast) = series.cast(&DataType::String) else {
        return Vec::new();
    };
    let Ok(ca) = cast.str() else {
        return Vec::new();
    };
    ca.into_iter()
        .flatten()
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn string_quality_signals(
    df: &DataFrame,
    categorical: &[String],
    opts: &ProfileOptions,
) -> BTreeMap<String, StringQuality> {
    let mut out = BTreeMap::new();
    for name in categorical {
        let Ok(col) = df.column(name) else { continue };
        let sample = string_sample(col.as_materialized_series(), opts.sample_size);
        if sample.is_empty() {
            continue;
        }
        let n = sample.len() as f64;
        let mut whitespace = 0usize;
        let mut empty = 0usize;
        let mut markers = 0usize;
        for value in &sample {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                whitespace += 1;
            }
            if trimmed.is_empty() {
                empty += 1;
            }
            if is_missing_marker(&trimmed.to_lowercase()) {
                markers += 1;
            }
        }
        if whitespace == 0 && empty == 0 && markers == 0 {
            continue;
        }
        out.insert(
            name.clone(),
            StringQuality {
                leading_trailing_fraction: whitespace as f64 / n,
                empty_after_strip_fraction: empty as f64 / n,
                missing_marker_fraction: markers as f64 / n,
            },
        );
    }
    out
}

fn boolean_candidate_signals(
    df: &DataFrame,
    categorical: &[String],
    opts: &ProfileOptions,
) -> Vec<BooleanCandidate> {
    let mut out = Vec::new();
    for name in categorical {
        let Ok(col) = df.column(name) else { continue };
        let sample = string_sample(col.as_materialized_series(), opts.sample_size);
        let distinct: BTreeSet<String> = sample
            .iter()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !is_missing_marker(v))
            .collect();
        let values: Vec<String> = distinct.into_iter().collect();
        if is_boolean_value_set(&values) {
            out.push(BooleanCandidate {
                column: name.clone(),
                values_sample: values,
            });
        }
    }
    out
}

fn datetime_candidate_signals(
    df: &DataFrame,
    categorical: &[String],
    opts: &ProfileOptions,
) -> Vec<DatetimeCandidate> {
    let mut out = Vec::new();
    for name in categorical {
        let Ok(col) = df.column(name) else { continue };
        let sample = string_sample(col.as_materialized_series(), opts.sample_size);
        if sample.is_empty() {
            continue;
        }
        let mean_letters =
            sample.iter().map(|v| letters_ratio(v)).sum::<f64>() / sample.len() as f64;
        if mean_letters > opts.max_letters_ratio {
            continue;
        }
        let parsed = sample
            .iter()
            .filter(|v| parse_datetime(v).is_some())
            .count();
        let success_ratio = parsed as f64 / sample.len() as f64;
        if success_ratio >= opts.datetime_success_ratio {
            out.push(DatetimeCandidate {
                column: name.clone(),
                success_ratio,
                letters_ratio: mean_letters,
            });
        }
    }
    out
}

/// Finite values of a numeric column, nulls preserved as `None`.
fn numeric_values(series: &Series) -> Option<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64).ok()?;
    let ca = cast.f64().ok()?;
    Some(
        ca.into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect(),
    )
}

fn skewness_signals(df: &DataFrame, numeric: &[String], opts: &ProfileOptions) -> SkewnessSignals {
    let mut per_numeric_column = BTreeMap::new();
    for name in numeric {
        let Ok(col) = df.column(name) else { continue };
        let Some(values) = numeric_values(col.as_materialized_series()) else {
            continue;
        };
        let present: Vec<f64> = values.into_iter().flatten().collect();
        if present.len() < opts.skew_min_rows {
            continue;
        }
        if let Some(skew) = sample_skewness(&present) {
            per_numeric_column.insert(name.clone(), skew);
        }
    }
    let mut ranked: Vec<ColumnStat> = per_numeric_column
        .iter()
        .filter(|(_, skew)| skew.abs() > SKEW_SIGNAL_THRESHOLD)
        .map(|(column, skew)| ColumnStat {
            column: column.clone(),
            value: *skew,
        })
        .collect();
    ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
    ranked.truncate(opts.top_k);
    SkewnessSignals {
        per_numeric_column,
        top_abs_skewed: ranked,
    }
}

fn outlier_signals(df: &DataFrame, numeric: &[String], opts: &ProfileOptions) -> OutlierSignals {
    let mut per_numeric_column = BTreeMap::new();
    for name in numeric {
        let Ok(col) = df.column(name) else { continue };
        let Some(values) = numeric_values(col.as_materialized_series()) else {
            continue;
        };
        let mut present: Vec<f64> = values.into_iter().flatten().collect();
        if present.len() < opts.outlier_min_rows {
            continue;
        }
        present.sort_by(f64::total_cmp);
        let (Some(q1), Some(q3)) = (
            quantile_sorted(&present, 0.25),
            quantile_sorted(&present, 0.75),
        ) else {
            continue;
        };
        let iqr = q3 - q1;
        if !iqr.is_finite() || iqr <= 0.0 {
            continue;
        }
        let lo = q1 - opts.iqr_k * iqr;
        let hi = q3 + opts.iqr_k * iqr;
        let outside = present.iter().filter(|v| **v < lo || **v > hi).count();
        per_numeric_column.insert(
            name.clone(),
            OutlierSignal {
                fraction: outside as f64 / present.len() as f64,
                iqr_k: opts.iqr_k,
            },
        );
    }
    let mut ranked: Vec<(String, f64)> = per_numeric_column
        .iter()
        .filter(|(_, s)| s.fraction > 0.0)
        .map(|(name, s)| (name.clone(), s.fraction))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(opts.top_k);
    OutlierSignals {
        per_numeric_column,
        top_outlier_columns: ranked.into_iter().map(|(name, _)| name).collect(),
    }
}

fn correlation_signals(
    df: &DataFrame,
    numeric: &[String],
    opts: &ProfileOptions,
) -> CorrelationSignals {
    let selected: Vec<&String> = numeric.iter().take(opts.max_corr_numeric_cols).collect();
    if selected.len() < 2 || df.height() < 2 {
        return CorrelationSignals::default();
    }
    // Deterministic stride sampling keeps large tables bounded.
    let stride = df.height().div_ceil(opts.corr_sample_rows.max(1)).max(1);
    let mut matrix: Vec<(String, Vec<Option<f64>>)> = Vec::with_capacity(selected.len());
    for name in selected {
        let Ok(col) = df.column(name) else { continue };
        let Some(values) = numeric_values(col.as_materialized_series()) else {
            continue;
        };
        let sampled: Vec<Option<f64>> = values.into_iter().step_by(stride).collect();
        matrix.push((name.clone(), sampled));
    }
    let mut pairs = Vec::new();
    for i in 0..matrix.len() {
        for j in (i + 1)..matrix.len() {
            if let Some(corr) = pearson(&matrix[i].1, &matrix[j].1) {
                pairs.push(CorrelationPair {
                    col_x: matrix[i].0.clone(),
                    col_y: matrix[j].0.clone(),
                    corr,
                });
            }
        }
    }
    pairs.sort_by(|a, b| b.corr.abs().total_cmp(&a.corr.abs()));
    pairs.truncate(opts.top_k);
    let max_abs_corr = pairs.first().map(|p| p.corr.abs());
    CorrelationSignals {
        top_abs_pairs: pairs,
        max_abs_corr,
    }
}
