//! Exact-value row filtering.
//!
//! [`ColumnFilter::filter`] keeps the rows whose cell in a named column
//! equals a user-supplied value under the column's native type comparison:
//! numeric equality for numeric columns, exact string match for text.
//! No matching rows is a valid outcome (an empty table), not an error.

use crate::error::{AnalystError, Result};
use crate::utils::{DtypeCategory, get_dtype_category, parse_numeric_string};
use polars::prelude::*;
use tracing::debug;

/// Filter that selects rows matching an exact value in one column.
pub struct ColumnFilter;

impl ColumnFilter {
    /// Keep rows where `column`'s cell equals `value`.
    ///
    /// The filter value arrives as text from the UI shell and is coerced to
    /// the column's native type for comparison. A value that cannot be
    /// coerced matches nothing and yields an empty table.
    ///
    /// # Errors
    ///
    /// [`AnalystError::UnknownColumn`] if `column` is not present.
    pub fn filter(&self, df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
        let series = df
            .column(column)
            .map_err(|_| AnalystError::UnknownColumn(column.to_string()))?
            .as_materialized_series()
            .clone();

        let filtered = match get_dtype_category(series.dtype()) {
            DtypeCategory::Numeric => {
                let Some(v) = parse_numeric_string(value) else {
                    debug!("Filter value '{}' is not numeric, no rows match", value);
                    return Ok(df.head(Some(0)));
                };
                df.clone()
                    .lazy()
                    .filter(col(column).cast(DataType::Float64).eq(lit(v)))
                    .collect()?
            }
            DtypeCategory::Boolean => {
                let Ok(v) = value.trim().to_ascii_lowercase().parse::<bool>() else {
                    debug!("Filter value '{}' is not boolean, no rows match", value);
                    return Ok(df.head(Some(0)));
                };
                df.clone().lazy().filter(col(column).eq(lit(v))).collect()?
            }
            _ => df
                .clone()
                .lazy()
                .filter(col(column).cast(DataType::String).eq(lit(value.to_string())))
                .collect()?,
        };

        debug!(
            "Filter {}=='{}' kept {} of {} rows",
            column,
            value,
            filtered.height(),
            df.height()
        );

        Ok(filtered)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sales_df() -> DataFrame {
        df![
            "region" => ["West", "East", "West", "North"],
            "sales" => [10i64, 20, 30, 10],
        ]
        .unwrap()
    }

    #[test]
    fn test_filter_string_column() {
        let df = sales_df();
        let filtered = ColumnFilter.filter(&df, "region", "West").unwrap();

        assert_eq!(filtered.height(), 2);
        let sales: Vec<i64> = filtered
            .column("sales")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(sales, vec![10, 30]);
    }

    #[test]
    fn test_filter_numeric_column() {
        let df = sales_df();
        let filtered = ColumnFilter.filter(&df, "sales", "10").unwrap();

        assert_eq!(filtered.height(), 2);
        let regions: Vec<&str> = filtered
            .column("region")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(regions, vec!["West", "North"]);
    }

    #[test]
    fn test_filter_no_match_returns_empty_table() {
        let df = sales_df();
        let filtered = ColumnFilter.filter(&df, "region", "South").unwrap();

        assert_eq!(filtered.height(), 0);
        // Schema survives for downstream stages
        assert_eq!(filtered.width(), 2);
    }

    #[test]
    fn test_filter_unknown_column() {
        let df = sales_df();
        let err = ColumnFilter.filter(&df, "country", "US").unwrap_err();

        assert_eq!(err.error_code(), "UNKNOWN_COLUMN");
        assert!(err.to_string().contains("country"));
    }

    #[test]
    fn test_filter_non_numeric_value_on_numeric_column() {
        let df = sales_df();
        let filtered = ColumnFilter.filter(&df, "sales", "West").unwrap();

        assert_eq!(filtered.height(), 0);
    }

    #[test]
    fn test_filter_preserves_row_order() {
        let df = df![
            "region" => ["West", "East", "West", "West"],
            "id" => [1i64, 2, 3, 4],
        ]
        .unwrap();
        let filtered = ColumnFilter.filter(&df, "region", "West").unwrap();

        let ids: Vec<i64> = filtered
            .column("id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }
}
