//! LLM grounding: bounded table previews, prompt assembly, and the
//! transport seam.
//!
//! [`PromptGrounder`] turns a table plus a free-text question into a
//! grounded prompt: a role statement, a rendered preview of the first rows,
//! then the literal question, in that order, with no other context
//! injected. The answer path fails closed: transport failures come back as
//! a user-facing answer string identifying the failure class, never as an
//! unhandled fault.
//!
//! # Implementing a New Transport
//!
//! Implement [`LlmTransport`] for your service struct (see
//! [`OllamaTransport`] for the reference implementation) and pass it to
//! [`PromptGrounder::ask`].

#[cfg(feature = "llm")]
mod ollama;

#[cfg(feature = "llm")]
pub use ollama::{OllamaConfig, OllamaConfigBuilder, OllamaTransport};

use crate::error::Result;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of table rows embedded in a prompt by default.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Errors from the synchronous LLM transport call.
///
/// The two spec-visible classes are connection failure and non-success
/// response; both carry the raw detail inline for diagnosis.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The model service could not be reached at all.
    #[error("Failed to connect to Ollama: {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("Error: {code} - {body}")]
    Status { code: u16, body: String },

    /// The service answered 200 but the body could not be decoded.
    #[error("Malformed response from model service: {0}")]
    Malformed(String),
}

/// Trait for the synchronous LLM transport.
///
/// One request, one response, full text returned as a single string. No
/// retry and no streaming token handling belong at this seam.
///
/// Implementations must be `Send + Sync` so a hosting shell can share one
/// transport across requests.
pub trait LlmTransport: Send + Sync {
    /// Submit a prompt and return the model's full answer text.
    fn generate(&self, prompt: &str) -> std::result::Result<String, TransportError>;

    /// Transport name for logging and debugging.
    fn name(&self) -> &str;

    /// The model identifier in use, if the transport exposes one.
    fn model(&self) -> Option<&str> {
        None
    }
}

static_assertions::assert_obj_safe!(LlmTransport);

/// Builds grounded prompts and submits them through a transport.
#[derive(Debug, Clone)]
pub struct PromptGrounder {
    preview_rows: usize,
}

impl Default for PromptGrounder {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PromptGrounder {
    /// Grounder with the default preview size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grounder with a custom preview size.
    pub fn with_preview_rows(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Build the grounded prompt: role statement, preview block, question.
    ///
    /// The preview is the first `preview_rows` rows of the table in row
    /// order, never a sample.
    pub fn ground(&self, df: &DataFrame, question: &str) -> Result<String> {
        let preview = render_preview(df, self.preview_rows)?;
        Ok(format!(
            "You are a data expert. Here is a preview of the dataset:\n\n\
            {}\n\n\
            Now answer this question from the user based on the dataset above:\n\n\
            {}\n",
            preview, question
        ))
    }

    /// Ground the question and submit it through the transport.
    ///
    /// Fails closed: any failure is formatted into the returned answer
    /// string (connection failures and non-success statuses keep their raw
    /// detail), so the caller always gets displayable text.
    pub fn ask(&self, df: &DataFrame, question: &str, transport: &dyn LlmTransport) -> String {
        let prompt = match self.ground(df, question) {
            Ok(prompt) => prompt,
            Err(e) => return e.to_string(),
        };

        debug!(
            "Submitting question through {} ({} preview rows)",
            transport.name(),
            self.preview_rows
        );

        match transport.generate(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("LLM transport failed: {}", e);
                e.to_string()
            }
        }
    }
}

/// Render the first `rows` rows of a table as a human-readable pipe table.
///
/// Header row, separator, then data rows; missing cells render empty.
pub fn render_preview(df: &DataFrame, rows: usize) -> Result<String> {
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut out = String::new();
    out.push_str(&format!("| {} |\n", names.join(" | ")));
    out.push_str(&format!(
        "| {} |\n",
        names.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
    ));

    let limit = rows.min(df.height());
    for i in 0..limit {
        let mut cells = Vec::with_capacity(names.len());
        for col in df.get_columns() {
            let value = col.as_materialized_series().get(i)?;
            cells.push(format_cell(&value));
        }
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    Ok(out)
}

/// Format one cell for the preview; strings render bare, missing cells empty.
fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Transport stub returning a canned result.
    struct StubTransport(std::result::Result<String, TransportError>);

    impl LlmTransport for StubTransport {
        fn generate(&self, _prompt: &str) -> std::result::Result<String, TransportError> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "Stub"
        }
    }

    /// Transport stub that records the prompt it received.
    struct RecordingTransport(std::sync::Mutex<String>);

    impl LlmTransport for RecordingTransport {
        fn generate(&self, prompt: &str) -> std::result::Result<String, TransportError> {
            *self.0.lock().unwrap() = prompt.to_string();
            Ok("ok".to_string())
        }

        fn name(&self) -> &str {
            "Recording"
        }
    }

    fn twenty_row_df() -> DataFrame {
        let ids: Vec<i64> = (1..=20).collect();
        let labels: Vec<String> = (1..=20).map(|i| format!("row{}", i)).collect();
        df!["id" => ids, "label" => labels].unwrap()
    }

    // -------------------------------------------------------------------------
    // Preview rendering
    // -------------------------------------------------------------------------

    #[test]
    fn test_preview_embeds_exactly_the_first_rows() {
        let df = twenty_row_df();
        let preview = render_preview(&df, 10).unwrap();

        assert!(preview.contains("| row1 |"));
        assert!(preview.contains("| row10 |"));
        assert!(!preview.contains("row11"));
        assert!(!preview.contains("row20"));

        // header + separator + 10 data rows
        assert_eq!(preview.lines().count(), 12);
    }

    #[test]
    fn test_preview_shorter_table_renders_all_rows() {
        let df = df!["a" => [1i64, 2]].unwrap();
        let preview = render_preview(&df, 10).unwrap();
        assert_eq!(preview.lines().count(), 4);
    }

    #[test]
    fn test_preview_renders_missing_cells_empty() {
        let df = df!["a" => [Some("x"), None]].unwrap();
        let preview = render_preview(&df, 10).unwrap();

        let last = preview.lines().last().unwrap();
        assert_eq!(last, "|  |");
    }

    #[test]
    fn test_preview_header_lists_column_names() {
        let df = twenty_row_df();
        let preview = render_preview(&df, 10).unwrap();
        assert!(preview.starts_with("| id | label |\n| --- | --- |\n"));
    }

    // -------------------------------------------------------------------------
    // Prompt assembly
    // -------------------------------------------------------------------------

    #[test]
    fn test_ground_orders_role_preview_question() {
        let df = twenty_row_df();
        let prompt = PromptGrounder::new()
            .ground(&df, "What is the total?")
            .unwrap();

        let role = prompt.find("You are a data expert").unwrap();
        let preview = prompt.find("| id | label |").unwrap();
        let question = prompt.find("What is the total?").unwrap();

        assert!(role < preview);
        assert!(preview < question);
    }

    #[test]
    fn test_ground_embeds_first_ten_of_twenty_rows() {
        let df = twenty_row_df();
        let prompt = PromptGrounder::new()
            .ground(&df, "What is the total?")
            .unwrap();

        assert!(prompt.contains("row10"));
        assert!(!prompt.contains("row11"));
    }

    #[test]
    fn test_ground_custom_preview_size() {
        let df = twenty_row_df();
        let prompt = PromptGrounder::with_preview_rows(3)
            .ground(&df, "q")
            .unwrap();

        assert!(prompt.contains("row3"));
        assert!(!prompt.contains("row4"));
    }

    // -------------------------------------------------------------------------
    // ask() fail-closed behavior
    // -------------------------------------------------------------------------

    #[test]
    fn test_ask_returns_answer_text() {
        let df = twenty_row_df();
        let transport = StubTransport(Ok("The total is 210.".to_string()));

        let answer = PromptGrounder::new().ask(&df, "What is the total?", &transport);
        assert_eq!(answer, "The total is 210.");
    }

    #[test]
    fn test_ask_passes_grounded_prompt_to_transport() {
        let df = twenty_row_df();
        let transport = RecordingTransport(std::sync::Mutex::new(String::new()));

        let _ = PromptGrounder::new().ask(&df, "What is the total?", &transport);

        let seen = transport.0.lock().unwrap();
        assert!(seen.starts_with("You are a data expert"));
        assert!(seen.contains("What is the total?"));
    }

    #[test]
    fn test_ask_surfaces_status_code_and_body() {
        let df = twenty_row_df();
        let transport = StubTransport(Err(TransportError::Status {
            code: 500,
            body: "internal error".to_string(),
        }));

        let answer = PromptGrounder::new().ask(&df, "q", &transport);
        assert!(answer.contains("500"));
        assert!(answer.contains("internal error"));
    }

    #[test]
    fn test_ask_surfaces_connection_failure() {
        let df = twenty_row_df();
        let transport = StubTransport(Err(TransportError::Connection(
            "connection refused".to_string(),
        )));

        let answer = PromptGrounder::new().ask(&df, "q", &transport);
        assert!(answer.contains("Failed to connect"));
        assert!(answer.contains("connection refused"));
    }
}
