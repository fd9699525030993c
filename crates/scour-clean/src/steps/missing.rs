//! Missing-token standardization.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use scour_model::StandardizeMissingReport;
use scour_profile::is_missing_marker;

use crate::error::Result;
use crate::frame::{replace_strings, string_column_names, string_values};

/// Replace recognized missing-value tokens with nulls. Text columns only.
///
/// Matching trims and lowercases the cell; the kept values are untouched.
/// With `whitespace_as_missing`, cells that are empty after trimming also
/// count as missing.
pub fn standardize_missing(
    df: DataFrame,
    enabled: bool,
    whitespace_as_missing: bool,
) -> Result<(DataFrame, StandardizeMissingReport)> {
    if !enabled {
        return Ok((df, StandardizeMissingReport::default()));
    }
    let mut df = df;
    let mut columns_touched = Vec::new();
    let mut replaced_counts = BTreeMap::new();
    for name in string_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        let mut replaced = 0usize;
        let standardized: Vec<Option<String>> = values
            .into_iter()
            .map(|v| {
                let s = v?;
                let trimmed = s.trim();
                // Whitespace-only cells trim to the empty token; whether
                // that counts is governed by the option. A literally empty
                // cell is always missing.
                let is_missing = if trimmed.is_empty() {
                    whitespace_as_missing || s.is_empty()
                } else {
                    is_missing_marker(&trimmed.to_lowercase())
                };
                if is_missing {
                    replaced += 1;
                    None
                } else {
                    Some(s)
                }
            })
            .collect();
        if replaced > 0 {
            replace_strings(&mut df, &name, standardized)?;
            replaced_counts.insert(name.clone(), replaced);
            columns_touched.push(name);
        }
    }
    Ok((
        df,
        StandardizeMissingReport {
            enabled: true,
            columns_touched,
            replaced_counts,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn default_tokens_become_null() {
        let frame = df! { "s" => ["N/A", " ", "ok", "unknown"] }.unwrap();
        let (out, report) = standardize_missing(frame, true, true).unwrap();
        let col = out.column("s").unwrap();
        assert_eq!(col.null_count(), 3);
        let kept: Vec<Option<&str>> = col
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(Some)
            .collect();
        assert_eq!(kept, vec![Some("ok")]);
        assert_eq!(report.replaced_counts["s"], 3);
    }

    #[test]
    fn whitespace_option_off_keeps_blank_cells() {
        let frame = df! { "s" => ["N/A", " ", "", "ok"] }.unwrap();
        let (out, _) = standardize_missing(frame, true, false).unwrap();
        // "N/A" and the literally empty cell go; " " survives.
        assert_eq!(out.column("s").unwrap().null_count(), 2);
    }

    #[test]
    fn untouched_columns_are_not_reported() {
        let frame = df! { "s" => ["a", "b"], "n" => [1i64, 2] }.unwrap();
        let (_, report) = standardize_missing(frame, true, true).unwrap();
        assert!(report.columns_touched.is_empty());
    }
}
