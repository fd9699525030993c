//! Scalar extraction helpers over polars `AnyValue`.

use polars::prelude::AnyValue;

/// Convert a cell to `f64` when it holds any numeric value.
pub fn any_to_f64(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Render a cell as display text. Nulls become the empty string so row
/// composites stay aligned.
pub fn any_to_string(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Render a cell for composite row keys. Nulls map to a NUL marker so a
/// missing cell never keys equal to an empty string.
pub fn any_to_key(value: &AnyValue) -> String {
    if matches!(value, AnyValue::Null) {
        "\u{0}".to_string()
    } else {
        any_to_string(value)
    }
}
