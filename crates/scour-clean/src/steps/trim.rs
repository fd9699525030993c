//! Whitespace hygiene for text columns.

use polars::prelude::DataFrame;
use scour_model::TrimStringsReport;

use crate::error::Result;
use crate::frame::{replace_strings, string_column_names, string_values};

/// Strip leading/trailing whitespace (including non-breaking space) and
/// collapse internal whitespace runs. Text columns only.
pub fn trim_strings(df: DataFrame, enabled: bool) -> Result<(DataFrame, TrimStringsReport)> {
    if !enabled {
        return Ok((df, TrimStringsReport::default()));
    }
    let mut df = df;
    let mut columns_touched = Vec::new();
    for name in string_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        let mut changed = false;
        let cleaned: Vec<Option<String>> = values
            .into_iter()
            .map(|v| {
                v.map(|s| {
                    let c = clean(&s);
                    if c != s {
                        changed = true;
                    }
                    c
                })
            })
            .collect();
        if changed {
            replace_strings(&mut df, &name, cleaned)?;
            columns_touched.push(name);
        }
    }
    Ok((
        df,
        TrimStringsReport {
            enabled: true,
            columns_touched,
        },
    ))
}

fn clean(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for c in value.chars() {
        if c.is_whitespace() || c == '\u{a0}' {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}
