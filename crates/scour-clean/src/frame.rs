//! Column materialization helpers shared by the steps.

use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsResult, Series};

/// Names of columns with the String dtype, in frame order.
pub fn string_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String)
        .map(|c| c.name().to_string())
        .collect()
}

/// Names of numeric columns, in frame order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| scour_profile::is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

/// Materialized values of a String column.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let ca = series.str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Replace a column with new string values under the same name.
pub fn replace_strings(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> PolarsResult<()> {
    df.replace(name, Series::new(name.into(), values))?;
    Ok(())
}

/// A column's values widened to `f64`, nulls preserved.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().collect())
}
