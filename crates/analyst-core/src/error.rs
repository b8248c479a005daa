//! Custom error types for the analyst pipeline.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! load → clean → filter → chart/ask → export flow.
//!
//! Errors are serializable so a hosting UI shell can receive them as
//! `{code, message}` pairs for display. None of these errors is fatal to a
//! hosting process: every failure degrades to "no result for this action",
//! leaving the session's table intact for retry.

use crate::grounding::TransportError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analyst pipeline.
#[derive(Error, Debug)]
pub enum AnalystError {
    /// Source file could not be parsed into a table. Fatal to the current
    /// pipeline run: the run halts before any cleaning step.
    #[error("Error loading file: {0}")]
    Load(String),

    /// A filter or chart request referenced a column absent from the table.
    #[error("Column '{0}' not found in dataset")]
    UnknownColumn(String),

    /// Bad chart type or a missing required column selection.
    #[error("Invalid chart request: {0}")]
    InvalidChartRequest(String),

    /// The LLM transport call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalystError {
    /// Get error code for frontend handling.
    ///
    /// These codes let a hosting shell distinguish failure classes (e.g.
    /// a load failure halts the run, an unknown column leaves it intact).
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "LOAD_ERROR",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::InvalidChartRequest(_) => "INVALID_CHART_REQUEST",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Check if this error halts the current pipeline run.
    ///
    /// Only a load failure is run-fatal; everything else leaves the loaded
    /// table and prior results in place.
    pub fn halts_run(&self) -> bool {
        matches!(self, Self::Load(_))
    }
}

/// Serialize implementation for shell/IPC compatibility.
///
/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to handle in a frontend.
impl Serialize for AnalystError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalystError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analyst pipeline operations.
pub type Result<T> = std::result::Result<T, AnalystError>;

/// Extension trait for mapping polars results into pipeline errors with context.
pub trait ResultExt<T> {
    /// Convert a polars error into a [`AnalystError::Load`] with a readable cause.
    fn load_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn load_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalystError::Load(format!("{}: {}", context.into(), e)))
    }
}
