//! Table load and export in the persisted tabular format (CSV).
//!
//! The exporter writes a single sheet of data: a header row of column names
//! followed by the rows, no index column. Export round-trips with
//! [`load_table`]: loading an exported table reproduces its columns, values,
//! and row order, within the loader's own type-inference limits.

use std::io::Cursor;

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Default download name offered for a cleaned table.
pub const EXPORT_FILE_NAME: &str = "cleaned_data.csv";

/// MIME type of the exported byte stream.
pub const EXPORT_MIME: &str = "text/csv";

/// An exported table plus the filename/MIME pair for the delivery sink.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

/// Load a table from a byte stream in the persisted tabular format.
///
/// Malformed input never panics: it surfaces as [`AnalystError::Load`] with
/// the underlying cause, and the pipeline run halts before any cleaning.
pub fn load_table(bytes: &[u8]) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .load_context("could not parse tabular source")?;

    debug!("Loaded table: {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

/// Serializer for the persisted tabular format.
pub struct TableExporter;

impl TableExporter {
    /// Serialize a table to bytes, header row included.
    pub fn export(&self, df: &DataFrame) -> Result<Vec<u8>> {
        let mut df = df.clone();
        let mut buf = Vec::new();

        CsvWriter::new(&mut buf)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        Ok(buf)
    }

    /// Serialize a table and pair it with the download name and MIME type
    /// expected by the delivery sink.
    pub fn export_file(&self, df: &DataFrame) -> Result<ExportedFile> {
        Ok(ExportedFile {
            bytes: self.export(df)?,
            file_name: EXPORT_FILE_NAME.to_string(),
            mime: EXPORT_MIME.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
