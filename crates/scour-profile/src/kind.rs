//! Column type grouping.
//!
//! The profiler and every pipeline step classify columns with the same
//! rules: declared datetime wins, then boolean, then numeric, and text or
//! categorical dtypes form the categorical catch-all. Anything else (nested
//! types, binary) is left out of the groups and untouched by the pipeline.

use polars::prelude::DataType;

/// Type family of a column for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Datetime,
    Categorical,
    Other,
}

/// Check if a dtype is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a dtype is a date/datetime/time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Check if a dtype is an integer type (used for integer-preserving clips).
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Classify a dtype into its cleaning type family.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_datetime_dtype(dtype) {
        ColumnKind::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Categorical
    } else {
        ColumnKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::TimeUnit;

    #[test]
    fn grouping_rules() {
        assert_eq!(column_kind(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Int32), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Datetime);
        assert_eq!(
            column_kind(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            ColumnKind::Datetime
        );
        assert_eq!(column_kind(&DataType::String), ColumnKind::Categorical);
        assert_eq!(column_kind(&DataType::Binary), ColumnKind::Other);
    }
}
