//! Explicit pipeline state for one user's run.
//!
//! [`AnalystSession`] owns the table flowing through the stages, replacing
//! the implicit one-table-per-UI-run global of a typical notebook app. Each
//! operation is one blocking call; the table is only replaced when an
//! operation succeeds, so any failure leaves the session intact for retry.
//! Concurrent users get independent sessions with no shared state.

use crate::chart::{ChartRequest, ChartSpec, ChartSpecBuilder};
use crate::cleaner::TableCleaner;
use crate::config::CleaningConfig;
use crate::error::Result;
use crate::filter::ColumnFilter;
use crate::grounding::{LlmTransport, PromptGrounder};
use crate::io::{self, ExportedFile, TableExporter};
use polars::prelude::*;
use tracing::info;

/// One user's interactive data-preparation session.
pub struct AnalystSession {
    table: DataFrame,
}

impl AnalystSession {
    /// Start a session from an already-loaded table.
    pub fn new(table: DataFrame) -> Self {
        Self { table }
    }

    /// Start a session from a byte stream in the persisted tabular format.
    ///
    /// A malformed source surfaces as [`AnalystError::Load`](crate::AnalystError::Load)
    /// and no session is created.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let table = io::load_table(bytes)?;
        info!(
            "Session started: {} rows x {} columns",
            table.height(),
            table.width()
        );
        Ok(Self::new(table))
    }

    /// The current table.
    pub fn table(&self) -> &DataFrame {
        &self.table
    }

    /// Consume the session, yielding the current table.
    pub fn into_table(self) -> DataFrame {
        self.table
    }

    /// First `rows` rows of the current table, for an "original data" view.
    pub fn preview(&self, rows: usize) -> DataFrame {
        self.table.head(Some(rows))
    }

    /// Column names with their data types, for a dtype panel.
    pub fn dtypes(&self) -> Vec<(String, String)> {
        self.table
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string()))
            .collect()
    }

    /// Clean the table in place under `config`.
    ///
    /// The table is replaced only on success.
    pub fn clean(&mut self, config: &CleaningConfig) -> Result<()> {
        let cleaned = TableCleaner.clean(&self.table, config)?;
        self.table = cleaned;
        Ok(())
    }

    /// Keep only rows where `column` equals `value`.
    ///
    /// An unknown column is reported and leaves the table unchanged.
    pub fn filter(&mut self, column: &str, value: &str) -> Result<()> {
        let filtered = ColumnFilter.filter(&self.table, column, value)?;
        self.table = filtered;
        Ok(())
    }

    /// Build a chart specification over the current table.
    pub fn chart(&self, request: &ChartRequest) -> Result<ChartSpec> {
        ChartSpecBuilder.build(&self.table, request)
    }

    /// Export the current table for download.
    pub fn export(&self) -> Result<ExportedFile> {
        TableExporter.export_file(&self.table)
    }

    /// Answer a free-text question about the current table.
    ///
    /// Always returns displayable text; transport failures come back as an
    /// answer string identifying the failure class.
    pub fn ask(&self, question: &str, transport: &dyn LlmTransport) -> String {
        PromptGrounder::new().ask(&self.table, question, transport)
    }
}

// ============================================================================
// Tests
// ============================================================================
