//! Column name normalization.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use scour_model::NormalizeReport;

use crate::error::Result;

/// Lowercase, trim, and underscore-join column names. Idempotent.
pub fn normalize(df: DataFrame, enabled: bool) -> Result<(DataFrame, NormalizeReport)> {
    if !enabled {
        return Ok((df, NormalizeReport::default()));
    }
    let old_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut new_names: Vec<String> = Vec::with_capacity(old_names.len());
    for (idx, name) in old_names.iter().enumerate() {
        let mut slug = slugify(name);
        if slug.is_empty() {
            slug = format!("col_{idx}");
        }
        // Collisions get a numeric suffix so the frame stays well-formed.
        let mut unique = slug.clone();
        let mut n = 2usize;
        while used.contains(&unique) {
            unique = format!("{slug}_{n}");
            n += 1;
        }
        used.insert(unique.clone());
        new_names.push(unique);
    }

    let mut renamed_columns = BTreeMap::new();
    for (old, new) in old_names.iter().zip(new_names.iter()) {
        if old != new {
            renamed_columns.insert(old.clone(), new.clone());
        }
    }

    let mut df = df;
    df.set_column_names(new_names.iter().map(String::as_str))?;
    Ok((
        df,
        NormalizeReport {
            enabled: true,
            renamed_columns,
        },
    ))
}

/// Lowercase; runs of non-alphanumeric characters collapse to one
/// underscore; leading/trailing underscores are stripped.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn slugs() {
        assert_eq!(slugify("  First Name  "), "first_name");
        assert_eq!(slugify("Total ($)"), "total");
        assert_eq!(slugify("A--B__C"), "a_b_c");
        assert_eq!(slugify("%%%"), "");
        assert_eq!(slugify("already_fine"), "already_fine");
    }

    #[test]
    fn renames_and_reports() {
        let frame = df! { "First Name" => ["a"], "AGE" => ["b"] }.unwrap();
        let (out, report) = normalize(frame, true).unwrap();
        assert_eq!(out.get_column_names()[0].as_str(), "first_name");
        assert_eq!(out.get_column_names()[1].as_str(), "age");
        assert_eq!(report.renamed_columns.len(), 2);
        assert_eq!(report.renamed_columns["First Name"], "first_name");
    }

    #[test]
    fn empty_name_gets_placeholder() {
        let frame = df! { "%%%" => [1i64], "x" => [2i64] }.unwrap();
        let (out, report) = normalize(frame, true).unwrap();
        assert_eq!(out.get_column_names()[0].as_str(), "col_0");
        assert_eq!(report.renamed_columns["%%%"], "col_0");
    }

    #[test]
    fn collisions_get_suffixes() {
        let frame = df! { "a b" => [1i64], "A_B" => [2i64] }.unwrap();
        let (out, _) = normalize(frame, true).unwrap();
        assert_eq!(out.get_column_names()[0].as_str(), "a_b");
        assert_eq!(out.get_column_names()[1].as_str(), "a_b_2");
    }

    #[test]
    fn idempotent() {
        let frame = df! { "First Name" => ["a"], "%%%" => ["b"] }.unwrap();
        let (once, _) = normalize(frame, true).unwrap();
        let names_once: Vec<String> = once.get_column_names().iter().map(|n| n.to_string()).collect();
        let (twice, report) = normalize(once, true).unwrap();
        let names_twice: Vec<String> =
            twice.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names_once, names_twice);
        assert!(report.renamed_columns.is_empty());
    }

    #[test]
    fn disabled_is_a_no_op() {
        let frame = df! { "First Name" => ["a"] }.unwrap();
        let (out, report) = normalize(frame, false).unwrap();
        assert_eq!(out.get_column_names()[0].as_str(), "First Name");
        assert!(!report.enabled);
    }
}
