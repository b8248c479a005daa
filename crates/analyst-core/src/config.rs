//! Configuration types for the cleaning stage.
//!
//! Uses the builder pattern for flexible and ergonomic setup from a UI
//! shell (checkboxes and a free-text fill value map directly onto fields).

use serde::{Deserialize, Serialize};

/// Configuration for [`TableCleaner::clean`](crate::cleaner::TableCleaner::clean).
///
/// Operations are applied in a fixed order: missing-row removal, duplicate
/// removal, then fill. The fill value therefore only touches cells that
/// survive the drop steps.
///
/// # Example
///
/// ```rust,ignore
/// use analyst_core::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .drop_missing(true)
///     .drop_duplicate_rows(true)
///     .fill_value("0")
///     .build();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Remove every row containing at least one missing cell.
    /// Default: true
    pub drop_missing: bool,

    /// Remove rows that are exact duplicates of an earlier-surviving row
    /// (first occurrence wins, comparison over all columns).
    /// Default: true
    pub drop_duplicate_rows: bool,

    /// Value used to fill remaining missing cells, applied last. Numeric
    /// columns receive a parsed numeric value when the string parses;
    /// otherwise the column is carried as text and filled verbatim.
    /// Default: None
    pub fill_value: Option<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            drop_missing: true,
            drop_duplicate_rows: true,
            fill_value: None,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }
}

/// Builder for [`CleaningConfig`].
#[derive(Default)]
pub struct CleaningConfigBuilder {
    drop_missing: Option<bool>,
    drop_duplicate_rows: Option<bool>,
    fill_value: Option<String>,
}

impl CleaningConfigBuilder {
    /// Set whether rows with missing cells are removed.
    pub fn drop_missing(mut self, drop_missing: bool) -> Self {
        self.drop_missing = Some(drop_missing);
        self
    }

    /// Set whether duplicate rows are removed.
    pub fn drop_duplicate_rows(mut self, drop_duplicate_rows: bool) -> Self {
        self.drop_duplicate_rows = Some(drop_duplicate_rows);
        self
    }

    /// Set the fill value for remaining missing cells.
    pub fn fill_value(mut self, fill_value: impl Into<String>) -> Self {
        self.fill_value = Some(fill_value.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CleaningConfig {
        let defaults = CleaningConfig::default();
        CleaningConfig {
            drop_missing: self.drop_missing.unwrap_or(defaults.drop_missing),
            drop_duplicate_rows: self
                .drop_duplicate_rows
                .unwrap_or(defaults.drop_duplicate_rows),
            fill_value: self.fill_value,
        }
    }
}
