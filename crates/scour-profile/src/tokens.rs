//! Shared token tables for missing-value markers and boolean pairs.
//!
//! The profiler uses these to detect candidates; the cleaning steps use the
//! same tables so a flagged column is handled with identical matching.

/// Text values treated as missing-value markers after trimming and
/// lowercasing.
pub const MISSING_MARKERS: &[&str] = &[
    "", "na", "n/a", "n.a.", "null", "none", "nan", "nil", "missing", "unknown", "?", "-", "--",
];

/// True/false token pairs recognized for boolean encoding, lowercased.
pub const BOOLEAN_TOKEN_PAIRS: &[(&str, &str)] = &[
    ("true", "false"),
    ("yes", "no"),
    ("y", "n"),
    ("1", "0"),
    ("t", "f"),
    ("on", "off"),
];

/// Check whether a trimmed, lowercased value is a missing-value marker.
pub fn is_missing_marker(normalized: &str) -> bool {
    MISSING_MARKERS.contains(&normalized)
}

/// Map a trimmed, lowercased value to a boolean if it belongs to a
/// recognized token pair.
pub fn boolean_token(normalized: &str) -> Option<bool> {
    for (t, f) in BOOLEAN_TOKEN_PAIRS {
        if normalized == *t {
            return Some(true);
        }
        if normalized == *f {
            return Some(false);
        }
    }
    None
}

/// Whether every distinct value in `values` belongs to a single token pair
/// (either side alone also counts). Values must already be trimmed and
/// lowercased; the set must be non-empty and small.
pub fn is_boolean_value_set(values: &[String]) -> bool {
    if values.is_empty() || values.len() > 2 {
        return false;
    }
    BOOLEAN_TOKEN_PAIRS
        .iter()
        .any(|(t, f)| values.iter().all(|v| v == t || v == f))
}
