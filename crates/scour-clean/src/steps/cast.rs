//! Content-driven type casting for text columns, plus numeric tidy-ups.
//!
//! Text columns run through an ordered rule list (money, percent, named
//! boolean, plain numeric); the first rule whose predicate matches gets to
//! parse the column, and keeps it only when enough non-missing values
//! parse. After the text rules, float columns that are nearly all integers
//! are promoted to `Int64`, low-cardinality text columns are recorded as
//! categorical, and case-variant enum values are normalized.
//!
//! Everything here is best-effort heuristics: a column that fails a rule's
//! ratio is left exactly as it was.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};
use scour_model::CastTypesReport;
use scour_profile::boolean_token;
use tracing::debug;

use crate::error::Result;
use crate::frame::{numeric_values, replace_strings, string_column_names, string_values};

/// Parse-success ratio required by the money and percent rules.
const MONEY_PERCENT_MIN_SUCCESS: f64 = 0.60;
/// Parse-success ratio required by the plain-numeric rule.
const NUMERIC_MIN_SUCCESS: f64 = 0.90;
/// Fraction of near-integer values required to promote a float column.
const INT_PROMOTION_RATIO: f64 = 0.99;
/// Distinct-value ceiling for the categorical demotion.
const CATEGORICAL_MAX_UNIQUE: usize = 50;
/// Values sampled when evaluating rule predicates.
const SAMPLE_SIZE: usize = 200;

const MONEY_NAME_HINTS: &[&str] = &[
    "price", "cost", "rate", "salary", "usd", "amount", "fee", "balance",
];
const PERCENT_NAME_HINTS: &[&str] = &["percent", "pct", "satisfaction"];
const BOOLEAN_NAME_PREFIXES: &[&str] = &["is_", "has_", "was_", "can_"];
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

enum Parsed {
    Float(f64),
    Bool(bool),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Money,
    Percent,
    NamedBoolean,
    Numeric,
}

/// One (predicate, parser) rule. Rules are tried in table order; the first
/// whose predicate matches owns the column.
struct TextRule {
    kind: RuleKind,
    applies: fn(name: &str, sample: &[String]) -> bool,
    parse: fn(value: &str) -> Option<Parsed>,
    min_success: f64,
}

const TEXT_RULES: &[TextRule] = &[
    TextRule {
        kind: RuleKind::Percent,
        applies: percent_applies,
        parse: parse_percent,
        min_success: MONEY_PERCENT_MIN_SUCCESS,
    },
    TextRule {
        kind: RuleKind::Money,
        applies: money_applies,
        parse: parse_money,
        min_success: MONEY_PERCENT_MIN_SUCCESS,
    },
    TextRule {
        kind: RuleKind::NamedBoolean,
        applies: boolean_applies,
        parse: parse_boolean,
        min_success: 1.0,
    },
    TextRule {
        kind: RuleKind::Numeric,
        applies: numeric_applies,
        parse: parse_plain,
        min_success: NUMERIC_MIN_SUCCESS,
    },
];

/// Apply the casting heuristics.
pub fn cast_types(df: DataFrame, enabled: bool) -> Result<(DataFrame, CastTypesReport)> {
    if !enabled {
        return Ok((df, CastTypesReport::default()));
    }
    let mut df = df;
    let mut report = CastTypesReport {
        enabled: true,
        ..CastTypesReport::default()
    };

    for name in string_column_names(&df) {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        let sample: Vec<String> = values
            .iter()
            .flatten()
            .take(SAMPLE_SIZE)
            .cloned()
            .collect();
        if sample.is_empty() {
            continue;
        }
        let Some(rule) = TEXT_RULES.iter().find(|r| (r.applies)(&name, &sample)) else {
            continue;
        };
        if let Some(series) = apply_rule(rule, &name, &values) {
            df.replace(&name, series)?;
            match rule.kind {
                RuleKind::Money => {
                    report.parsed_money_columns.push(name.clone());
                    report.converted_to_numeric.push(name);
                }
                RuleKind::Percent => {
                    report.parsed_percent_columns.push(name.clone());
                    report.converted_to_numeric.push(name);
                }
                RuleKind::NamedBoolean => report.parsed_boolean_columns.push(name),
                RuleKind::Numeric => report.converted_to_numeric.push(name),
            }
        }
    }

    promote_integers(&mut df, &mut report)?;
    mark_categoricals(&df, &mut report);
    normalize_enums(&mut df, &mut report)?;

    debug!(
        numeric = report.converted_to_numeric.len(),
        int = report.converted_to_int.len(),
        categorical = report.converted_to_categorical.len(),
        "cast_types finished"
    );
    Ok((df, report))
}

/// Parse every non-missing value; keep the column only when the success
/// ratio clears the rule's bar.
fn apply_rule(rule: &TextRule, name: &str, values: &[Option<String>]) -> Option<Series> {
    let non_null = values.iter().flatten().count();
    if non_null == 0 {
        return None;
    }
    let parsed: Vec<Option<Parsed>> = values
        .iter()
        .map(|v| v.as_deref().and_then(|s| (rule.parse)(s)))
        .collect();
    let successes = parsed.iter().flatten().count();
    if (successes as f64 / non_null as f64) < rule.min_success {
        return None;
    }
    let series = match rule.kind {
        RuleKind::NamedBoolean => {
            let bools: Vec<Option<bool>> = parsed
                .into_iter()
                .map(|p| match p {
                    Some(Parsed::Bool(b)) => Some(b),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), bools)
        }
        _ => {
            let floats: Vec<Option<f64>> = parsed
                .into_iter()
                .map(|p| match p {
                    Some(Parsed::Float(f)) => Some(f),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), floats)
        }
    };
    Some(series)
}

fn money_applies(name: &str, sample: &[String]) -> bool {
    let lname = name.to_lowercase();
    if MONEY_NAME_HINTS.iter().any(|h| lname.contains(h)) {
        return true;
    }
    let symbol_like = sample
        .iter()
        .filter(|v| {
            let t = v.trim();
            t.starts_with(CURRENCY_SYMBOLS) || t.ends_with(CURRENCY_SYMBOLS)
        })
        .count();
    symbol_like as f64 / sample.len() as f64 >= MONEY_PERCENT_MIN_SUCCESS
}

fn percent_applies(name: &str, sample: &[String]) -> bool {
    let lname = name.to_lowercase();
    if PERCENT_NAME_HINTS.iter().any(|h| lname.contains(h)) {
        return true;
    }
    let percent_like = sample.iter().filter(|v| v.trim().ends_with('%')).count();
    percent_like as f64 / sample.len() as f64 >= MONEY_PERCENT_MIN_SUCCESS
}

fn boolean_applies(name: &str, _sample: &[String]) -> bool {
    let lname = name.to_lowercase();
    BOOLEAN_NAME_PREFIXES.iter().any(|p| lname.starts_with(p))
}

fn numeric_applies(_name: &str, sample: &[String]) -> bool {
    let parseable = sample
        .iter()
        .filter(|v| parse_decimal(v.trim()).is_some())
        .count();
    parseable as f64 / sample.len() as f64 >= NUMERIC_MIN_SUCCESS
}

fn parse_money(value: &str) -> Option<Parsed> {
    let stripped = value
        .trim()
        .trim_start_matches(CURRENCY_SYMBOLS)
        .trim_end_matches(CURRENCY_SYMBOLS)
        .trim();
    parse_decimal(stripped).map(Parsed::Float)
}

fn parse_percent(value: &str) -> Option<Parsed> {
    let stripped = value.trim().strip_suffix('%').unwrap_or(value.trim());
    parse_decimal(stripped.trim()).map(|v| Parsed::Float(v / 100.0))
}

fn parse_boolean(value: &str) -> Option<Parsed> {
    boolean_token(&value.trim().to_lowercase()).map(Parsed::Bool)
}

fn parse_plain(value: &str) -> Option<Parsed> {
    parse_decimal(value.trim()).map(Parsed::Float)
}

/// Parse a number allowing thousands separators and a decimal comma.
///
/// When both separators appear, the right-most one is the decimal point. A
/// single comma followed by at most two digits reads as a decimal comma;
/// otherwise commas read as thousands separators.
fn parse_decimal(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let has_comma = s.contains(',');
    let has_dot = s.contains('.');
    let normalized: String = if has_comma && has_dot {
        let decimal_is_comma = s.rfind(',') > s.rfind('.');
        if decimal_is_comma {
            s.chars()
                .filter(|c| *c != '.')
                .map(|c| if c == ',' { '.' } else { c })
                .collect()
        } else {
            s.chars().filter(|c| *c != ',').collect()
        }
    } else if has_comma {
        let after = &s[s.rfind(',').map(|i| i + 1)?..];
        if s.matches(',').count() == 1 && after.len() <= 2 {
            s.replacen(',', ".", 1)
        } else {
            s.chars().filter(|c| *c != ',').collect()
        }
    } else {
        s.to_string()
    };
    let parsed: f64 = normalized.parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Promote float columns whose values are nearly all whole numbers.
fn promote_integers(df: &mut DataFrame, report: &mut CastTypesReport) -> Result<()> {
    let float_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| matches!(c.dtype(), DataType::Float32 | DataType::Float64))
        .map(|c| c.name().to_string())
        .collect();
    for name in float_cols {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = numeric_values(col.as_materialized_series()) else {
            continue;
        };
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            continue;
        }
        let near_int = present
            .iter()
            .filter(|v| (*v - v.round()).abs() < 1e-9 && v.abs() < i64::MAX as f64)
            .count();
        if (near_int as f64 / present.len() as f64) < INT_PROMOTION_RATIO {
            continue;
        }
        let ints: Vec<Option<i64>> = values
            .into_iter()
            .map(|v| {
                v.and_then(|f| {
                    let r = f.round();
                    (r.abs() < i64::MAX as f64).then_some(r as i64)
                })
            })
            .collect();
        df.replace(&name, Series::new(name.as_str().into(), ints))?;
        report.converted_to_int.push(name);
    }
    Ok(())
}

/// Record low-cardinality text columns as categorical. The physical
/// representation stays string; the classification drives imputation and
/// profiling, which treat string and categorical identically.
fn mark_categoricals(df: &DataFrame, report: &mut CastTypesReport) {
    for name in string_column_names(df) {
        let Ok(col) = df.column(&name) else { continue };
        let series = col.as_materialized_series().drop_nulls();
        if series.is_empty() {
            continue;
        }
        if let Ok(unique) = series.n_unique()
            && unique <= CATEGORICAL_MAX_UNIQUE
        {
            report.converted_to_categorical.push(name);
        }
    }
}

/// Fold case-variant spellings of enum-like columns onto their most
/// frequent form.
fn normalize_enums(df: &mut DataFrame, report: &mut CastTypesReport) -> Result<()> {
    let candidates = report.converted_to_categorical.clone();
    for name in candidates {
        let Ok(col) = df.column(&name) else { continue };
        let Ok(values) = string_values(col.as_materialized_series()) else {
            continue;
        };
        // Count spellings per case-insensitive group.
        let mut groups: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for v in values.iter().flatten() {
            *groups
                .entry(v.to_lowercase())
                .or_default()
                .entry(v.clone())
                .or_default() += 1;
        }
        if groups.values().all(|forms| forms.len() <= 1) {
            continue;
        }
        let canonical: BTreeMap<String, String> = groups
            .into_iter()
            .map(|(key, forms)| {
                let best = forms
                    .into_iter()
                    .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                    .map(|(form, _)| form)
                    .unwrap_or_default();
                (key, best)
            })
            .collect();
        let folded: Vec<Option<String>> = values
            .into_iter()
            .map(|v| v.map(|s| canonical.get(&s.to_lowercase()).cloned().unwrap_or(s)))
            .collect();
        replace_strings(df, &name, folded)?;
        report.normalized_enum_columns.push(name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;

    #[test]
    fn decimal_parsing() {
        assert_eq!(parse_decimal("1234.5"), Some(1234.5));
        assert_eq!(parse_decimal("1,234.50"), Some(1234.5));
        assert_eq!(parse_decimal("1.234,50"), Some(1234.5));
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn money_column_by_symbol() {
        let frame = df! { "col" => ["$1,200.50", "$980", "$0.99", "bad"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.parsed_money_columns, vec!["col"]);
        let col = out.column("col").unwrap();
        assert!(matches!(col.dtype(), DataType::Float64 | DataType::Int64));
        // The unparseable cell becomes missing, not an abort.
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn money_column_by_name_hint() {
        let frame = df! { "unit_price" => ["1200", "980", "50"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.parsed_money_columns, vec!["unit_price"]);
        // Whole-number money promotes to integers afterwards.
        assert_eq!(out.column("unit_price").unwrap().dtype(), &DataType::Int64);
        assert!(report.converted_to_int.contains(&"unit_price".to_string()));
    }

    #[test]
    fn percent_column() {
        let frame = df! { "growth" => ["10%", "25%", "3.5%"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.parsed_percent_columns, vec!["growth"]);
        let col = out.column("growth").unwrap().as_materialized_series().clone();
        let vals: Vec<f64> = col.f64().unwrap().into_iter().flatten().collect();
        assert_eq!(vals, vec![0.10, 0.25, 0.035]);
    }

    #[test]
    fn named_boolean_column() {
        let frame = df! { "is_active" => ["yes", "no", "yes"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.parsed_boolean_columns, vec!["is_active"]);
        assert_eq!(out.column("is_active").unwrap().dtype(), &DataType::Boolean);
    }

    #[test]
    fn mixed_named_boolean_is_left_alone() {
        let frame = df! { "is_active" => ["yes", "no", "maybe"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert!(report.parsed_boolean_columns.is_empty());
        assert_eq!(out.column("is_active").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn low_parse_ratio_leaves_column_unconverted() {
        let frame = df! { "price" => ["cheap", "expensive", "moderate", "$5"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert!(report.parsed_money_columns.is_empty());
        assert_eq!(out.column("price").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn float_promotion_requires_near_integers() {
        let frame = df! {
            "whole" => [1.0f64, 2.0, 3.0],
            "frac" => [1.5f64, 2.5, 3.5],
        }
        .unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.converted_to_int, vec!["whole"]);
        assert_eq!(out.column("whole").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("frac").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn enum_case_variants_fold() {
        let frame = df! { "color" => ["Red", "red", "red", "Blue"] }.unwrap();
        let (out, report) = cast_types(frame, true).unwrap();
        assert_eq!(report.normalized_enum_columns, vec!["color"]);
        assert!(report.converted_to_categorical.contains(&"color".to_string()));
        let col = out.column("color").unwrap().as_materialized_series().clone();
        let vals: Vec<&str> = col.str().unwrap().into_iter().flatten().collect();
        assert_eq!(vals, vec!["red", "red", "red", "Blue"]);
    }
}
