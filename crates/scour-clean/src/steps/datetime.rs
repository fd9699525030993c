//! Datetime inference on text columns.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series, TimeUnit};
use scour_model::DatetimeInferenceReport;
use scour_profile::parse::{letters_ratio, parse_epoch_ms};

use crate::error::Result;
use crate::frame::{string_column_names, string_values};

/// Letter-character ratio above which a column is never attempted.
const MAX_LETTERS_RATIO: f64 = 0.3;
/// Values sampled for the letters-ratio prefilter.
const SAMPLE_SIZE: usize = 200;

/// Convert text columns that mostly parse as dates.
///
/// The letters-ratio prefilter protects free-text columns: a column that
/// fails it is never attempted regardless of how its values would parse.
/// The success-ratio comparison is inclusive.
pub fn datetime_inference(
    df: DataFrame,
    enabled: bool,
    success_ratio: f64,
) -> Result<(DataFrame, DatetimeInferenceReport)> {
    if !enabled {
        return Ok((df, DatetimeInferenceReport::default()));
    }
    let mut df = df;
    let mut inferred_columns = Vec::new();
    for name in string_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        let non_null: Vec<&String> = values.iter().flatten().collect();
        if non_null.is_empty() {
            continue;
        }
        let sample_len = non_null.len().min(SAMPLE_SIZE);
        let mean_letters = non_null[..sample_len]
            .iter()
            .map(|v| letters_ratio(v))
            .sum::<f64>()
            / sample_len as f64;
        if mean_letters > MAX_LETTERS_RATIO {
            continue;
        }
        let parsed: Vec<Option<i64>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_epoch_ms))
            .collect();
        let successes = parsed.iter().flatten().count();
        if (successes as f64 / non_null.len() as f64) < success_ratio {
            continue;
        }
        let series = Series::new(name.as_str().into(), parsed)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        df.replace(&name, series)?;
        inferred_columns.push(name);
    }
    Ok((
        df,
        DatetimeInferenceReport {
            enabled: true,
            inferred_columns,
            datetime_success_ratio: success_ratio,
        },
    ))
}
