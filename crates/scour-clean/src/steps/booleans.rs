//! Boolean encoding for token-pair text columns.

use std::collections::BTreeSet;

use polars::prelude::{DataFrame, NamedFrom, Series};
use scour_model::EncodeBooleansReport;
use scour_profile::{boolean_token, is_boolean_value_set};

use crate::error::Result;
use crate::frame::{string_column_names, string_values};

/// Convert text columns whose whole non-missing value set belongs to one
/// true/false token pair. A single out-of-set value leaves the column as is.
pub fn encode_booleans(df: DataFrame, enabled: bool) -> Result<(DataFrame, EncodeBooleansReport)> {
    if !enabled {
        return Ok((df, EncodeBooleansReport::default()));
    }
    let mut df = df;
    let mut columns_converted = Vec::new();
    for name in string_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        let distinct: BTreeSet<String> = values
            .iter()
            .flatten()
            .map(|v| v.trim().to_lowercase())
            .collect();
        let distinct: Vec<String> = distinct.into_iter().collect();
        if !is_boolean_value_set(&distinct) {
            continue;
        }
        let bools: Vec<Option<bool>> = values
            .into_iter()
            .map(|v| v.and_then(|s| boolean_token(&s.trim().to_lowercase())))
            .collect();
        df.replace(&name, Series::new(name.as_str().into(), bools))?;
        columns_converted.push(name);
    }
    Ok((
        df,
        EncodeBooleansReport {
            enabled: true,
            columns_converted,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataType, df};

    #[test]
    fn token_pair_column_converts() {
        let frame = df! {
            "active" => [Some("Yes"), Some("no"), None, Some("YES")],
            "free" => ["yes", "sometimes", "no", "no"],
        }
        .unwrap();
        let (out, report) = encode_booleans(frame, true).unwrap();
        assert_eq!(report.columns_converted, vec!["active"]);
        let col = out.column("active").unwrap();
        assert_eq!(col.dtype(), &DataType::Boolean);
        assert_eq!(col.null_count(), 1);
        assert_eq!(out.column("free").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn single_sided_column_converts() {
        let frame = df! { "flag" => ["y", "y", "y"] }.unwrap();
        let (out, report) = encode_booleans(frame, true).unwrap();
        assert_eq!(report.columns_converted, vec!["flag"]);
        assert_eq!(out.column("flag").unwrap().dtype(), &DataType::Boolean);
    }

    #[test]
    fn mixed_pairs_do_not_convert() {
        let frame = df! { "odd" => ["yes", "0"] }.unwrap();
        let (_, report) = encode_booleans(frame, true).unwrap();
        assert!(report.columns_converted.is_empty());
    }
}
