//! Duplicate-row removal.

use std::collections::BTreeSet;

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray, PlSmallStr};
use scour_model::DeduplicateReport;
use scour_profile::values::any_to_key;

use crate::error::Result;

/// Which occurrence of a duplicate group survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupKeep {
    #[default]
    First,
    Last,
}

/// Deduplication settings. An empty (or fully unknown) subset means
/// full-row equality.
#[derive(Debug, Clone, Default)]
pub struct DedupOptions {
    pub subset: Vec<String>,
    pub keep: DedupKeep,
}

pub fn deduplicate(
    df: DataFrame,
    enabled: bool,
    options: &DedupOptions,
) -> Result<(DataFrame, DeduplicateReport)> {
    if !enabled {
        return Ok((df, DeduplicateReport::default()));
    }
    let rows_before = df.height();
    if rows_before == 0 || df.width() == 0 {
        return Ok((
            df,
            DeduplicateReport {
                enabled: true,
                rows_before,
                rows_after: rows_before,
                dropped_duplicates: 0,
            },
        ));
    }

    // Subset columns missing from the table are ignored; an empty result
    // falls back to full-row equality.
    let all_names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    let mut considered: Vec<String> = options
        .subset
        .iter()
        .filter(|n| all_names.contains(n))
        .cloned()
        .collect();
    if considered.is_empty() {
        considered = all_names;
    }

    let keys = row_keys(&df, &considered);
    let keep = match options.keep {
        DedupKeep::First => keep_mask(keys.iter()),
        DedupKeep::Last => {
            let mut mask = keep_mask(keys.iter().rev());
            mask.reverse();
            mask
        }
    };
    let dropped = keep.iter().filter(|k| !**k).count();
    let df = if dropped > 0 {
        let mask = BooleanChunked::from_slice(PlSmallStr::from_static("keep"), &keep);
        df.filter(&mask)?
    } else {
        df
    };
    Ok((
        df,
        DeduplicateReport {
            enabled: true,
            rows_before,
            rows_after: rows_before - dropped,
            dropped_duplicates: dropped,
        },
    ))
}

fn row_keys(df: &DataFrame, considered: &[String]) -> Vec<String> {
    let cols: Vec<_> = considered.iter().filter_map(|n| df.column(n).ok()).collect();
    (0..df.height())
        .map(|row| {
            let mut key = String::new();
            for col in &cols {
                let value = col.get(row).unwrap_or(AnyValue::Null);
                key.push_str(&any_to_key(&value));
                key.push('\u{1f}');
            }
            key
        })
        .collect()
}

fn keep_mask<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<bool> {
    let mut seen = BTreeSet::new();
    keys.map(|k| seen.insert(k.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn full_row_keep_first() {
        let frame = df! {
            "a" => [1i64, 1, 2, 1],
            "b" => ["x", "x", "y", "x"],
        }
        .unwrap();
        let (out, report) = deduplicate(frame, true, &DedupOptions::default()).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(report.dropped_duplicates, 2);
        let a: Vec<i64> = out
            .column("a")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(a, vec![1, 2]);
    }

    #[test]
    fn subset_keep_last() {
        let frame = df! {
            "id" => [1i64, 1, 2],
            "v" => ["old", "new", "only"],
        }
        .unwrap();
        let options = DedupOptions {
            subset: vec!["id".into(), "not_a_column".into()],
            keep: DedupKeep::Last,
        };
        let (out, report) = deduplicate(frame, true, &options).unwrap();
        assert_eq!(report.dropped_duplicates, 1);
        let v: Vec<&str> = out
            .column("v")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(v, vec!["new", "only"]);
    }

    #[test]
    fn null_and_empty_string_rows_are_distinct() {
        let frame = df! {
            "a" => [Some(""), None],
            "b" => [1i64, 1],
        }
        .unwrap();
        let (out, report) = deduplicate(frame, true, &DedupOptions::default()).unwrap();
        assert_eq!(report.dropped_duplicates, 0);
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn unknown_subset_falls_back_to_full_row() {
        let frame = df! { "a" => [1i64, 1] }.unwrap();
        let options = DedupOptions {
            subset: vec!["ghost".into()],
            keep: DedupKeep::First,
        };
        let (out, _) = deduplicate(frame, true, &options).unwrap();
        assert_eq!(out.height(), 1);
    }
}
