//! Interactive Data Analyst Core
//!
//! The data cleaning → visualization-dispatch → LLM-grounding core of an
//! interactive tabular exploration tool, built on Polars.
//!
//! # Overview
//!
//! This library provides the pure transformation and dispatch stages that
//! turn a raw table plus user choices into results:
//!
//! - **Cleaning**: missing-row removal, order-stable duplicate removal,
//!   and configurable fill values
//! - **Filtering**: exact-value row selection with native type comparison
//! - **Chart specs**: a fixed catalog of chart types mapped to declarative,
//!   renderer-agnostic specifications (including derived columns such as the
//!   waterfall running sum)
//! - **Export**: round-trippable serialization of the cleaned table
//! - **Grounded Q&A**: bounded table previews embedded in prompts submitted
//!   through a pluggable LLM transport
//!
//! The interactive shell, the rendering engine, and the spreadsheet codec
//! are external collaborators: this crate only produces values they consume.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use analyst_core::{
//!     AnalystSession, ChartRequest, ChartType, CleaningConfig, OllamaTransport,
//! };
//!
//! // Load and clean
//! let mut session = AnalystSession::from_bytes(&uploaded_bytes)?;
//! session.clean(&CleaningConfig::builder().fill_value("0").build())?;
//!
//! // Visualize
//! let spec = session.chart(&ChartRequest::with_y(ChartType::Waterfall, "month", "delta"))?;
//! renderer.draw(&spec, container_width);
//!
//! // Ask a grounded question
//! let transport = OllamaTransport::new()?;
//! let answer = session.ask("Which region has the highest sales?", &transport);
//!
//! // Download the cleaned data
//! let file = session.export()?;
//! sink.deliver(file.bytes, &file.file_name, &file.mime);
//! ```
//!
//! # Transports
//!
//! Question answering talks to the model service through the
//! [`grounding::LlmTransport`] trait. [`grounding::OllamaTransport`] (behind
//! the default-on `llm` feature) is the provided implementation; a hosting
//! shell can supply its own for other services.
//!
//! # Error Handling
//!
//! Every failure is an [`AnalystError`] recovered at the session boundary
//! and serializable as a `{code, message}` pair. Nothing here is fatal to a
//! hosting process: a failed action degrades to "no result", leaving the
//! session's table and prior results intact for retry.

pub mod chart;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod grounding;
pub mod io;
pub mod pipeline;
pub mod utils;

// Re-exports for convenient access
pub use chart::{ChartRequest, ChartSpec, ChartSpecBuilder, ChartType, Channel, Encoding, Mark};
pub use cleaner::TableCleaner;
pub use config::{CleaningConfig, CleaningConfigBuilder};
pub use error::{AnalystError, Result as AnalystResult, ResultExt};
pub use filter::ColumnFilter;
pub use grounding::{
    DEFAULT_PREVIEW_ROWS, LlmTransport, PromptGrounder, TransportError, render_preview,
};
#[cfg(feature = "llm")]
pub use grounding::{OllamaConfig, OllamaConfigBuilder, OllamaTransport};
pub use io::{EXPORT_FILE_NAME, EXPORT_MIME, ExportedFile, TableExporter, load_table};
pub use pipeline::AnalystSession;
pub use utils::{
    DtypeCategory, clean_numeric_string, get_dtype_category, is_integer_dtype, is_numeric_dtype,
    parse_integer_string, parse_numeric_string,
};
