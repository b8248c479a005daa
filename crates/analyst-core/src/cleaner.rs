//! Data cleaning for loaded tables.
//!
//! [`TableCleaner::clean`] applies a deterministic sequence of operations
//! controlled by [`CleaningConfig`]:
//!
//! 1. Removing rows containing missing values
//! 2. Removing duplicate rows (first occurrence wins, row order preserved)
//! 3. Filling remaining missing cells with a user-supplied value
//!
//! Cleaning is a pure transformation: the input table is never mutated and
//! a new table is returned for the next stage.

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::utils::{
    DtypeCategory, get_dtype_category, is_integer_dtype, parse_integer_string, parse_numeric_string,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Cleaner for user-configured table cleaning operations.
pub struct TableCleaner;

impl TableCleaner {
    /// Clean a table under the given configuration.
    ///
    /// Never fails for a well-formed table; an absent or empty table is the
    /// caller's precondition to enforce.
    pub fn clean(&self, df: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
        let mut df = df.clone();

        info!("Cleaning data...");

        if config.drop_missing {
            let before = df.height();
            df = drop_missing_rows(df)?;
            let removed = before - df.height();
            if removed > 0 {
                debug!("Removed {} rows with missing values", removed);
            }
        }

        if config.drop_duplicate_rows {
            let before = df.height();
            df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
            let removed = before - df.height();
            if removed > 0 {
                debug!("Removed {} duplicate rows", removed);
            }
        }

        if let Some(fill) = &config.fill_value {
            df = fill_missing_cells(df, fill)?;
        }

        Ok(df)
    }
}

/// Remove every row containing at least one null cell.
fn drop_missing_rows(df: DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(df);
    }

    // Accumulate null counts per row across columns
    let mut null_counts = Series::new("nulls".into(), vec![0u32; df.height()]);
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let null_mask = series.is_null();
        if let Ok(null_int) = null_mask.cast(&DataType::UInt32)
            && let Ok(sum) = &null_counts + &null_int
        {
            null_counts = sum;
        }
    }

    // Keep rows whose null count is zero
    let null_counts_f64 = null_counts.cast(&DataType::Float64)?;
    let mask = null_counts_f64.lt_eq(0.0)?;

    Ok(df.filter(&mask)?)
}

/// Replace remaining null cells in every column with the fill value.
fn fill_missing_cells(df: DataFrame, fill: &str) -> Result<DataFrame> {
    let mut df = df;
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut total_filled = 0;

    for col_name in &column_names {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let null_count = series.null_count();
        if null_count == 0 {
            continue;
        }

        let filled = fill_series(&series, fill)?;
        df.replace(col_name, filled)?;
        total_filled += null_count;
    }

    if total_filled > 0 {
        debug!("Filled {} missing cells with '{}'", total_filled, fill);
    }

    Ok(df)
}

/// Fill nulls in one series, coercing the fill value to the column's type
/// where it parses; otherwise the column is carried as text and the raw
/// value is filled verbatim.
fn fill_series(series: &Series, fill: &str) -> Result<Series> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            if is_integer_dtype(series.dtype())
                && let Some(v) = parse_integer_string(fill)
            {
                let cast = series.cast(&DataType::Int64)?;
                let ca = cast.i64()?;
                let values: Vec<Option<i64>> =
                    ca.into_iter().map(|opt| opt.or(Some(v))).collect();
                Ok(Series::new(series.name().clone(), values))
            } else if let Some(v) = parse_numeric_string(fill) {
                let cast = series.cast(&DataType::Float64)?;
                let ca = cast.f64()?;
                let values: Vec<Option<f64>> =
                    ca.into_iter().map(|opt| opt.or(Some(v))).collect();
                Ok(Series::new(series.name().clone(), values))
            } else {
                fill_as_text(series, fill)
            }
        }
        // Text columns take the raw value; boolean, datetime, and anything
        // else is carried as text and filled the same way
        _ => fill_as_text(series, fill),
    }
}

fn fill_as_text(series: &Series, fill: &str) -> Result<Series> {
    let cast = series.cast(&DataType::String)?;
    let ca = cast.str()?;
    let values: Vec<Option<String>> = ca
        .into_iter()
        .map(|opt| match opt {
            Some(val) => Some(val.to_string()),
            None => Some(fill.to_string()),
        })
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

// ============================================================================
// Tests
// ============================================================================
