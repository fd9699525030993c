//! Date/time string parsing.
//!
//! Candidate detection and the datetime inference step share one format
//! table so a column flagged as parseable here converts with the same
//! success ratio during cleaning. Parsed values are reduced to epoch
//! milliseconds, which is what the inference step stores.

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y%m%d%H%M%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a date/time string against the shared format table.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    // RFC 3339 with offset: take the naive local representation.
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse to epoch milliseconds, the storage form used for inferred
/// datetime columns.
pub fn parse_epoch_ms(value: &str) -> Option<i64> {
    parse_datetime(value).map(|dt| dt.and_utc().timestamp_millis())
}

/// Fraction of the value's characters that are alphabetic. Used to skip
/// free-text columns before attempting datetime parses.
pub fn letters_ratio(value: &str) -> f64 {
    let total = value.chars().count();
    if total == 0 {
        return 0.0;
    }
    let letters = value.chars().filter(|c| c.is_alphabetic()).count();
    letters as f64 / total as f64
}
