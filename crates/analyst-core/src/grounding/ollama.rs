//! Ollama transport implementation.
//!
//! [`OllamaTransport`] implements [`LlmTransport`] against a local or
//! remote Ollama server (<https://ollama.com>) via its `/api/generate`
//! endpoint. One blocking request per question, `stream: false`, full text
//! returned in the `response` field of the JSON body.

use std::time::Duration;

use super::{LlmTransport, TransportError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

/// Default Ollama endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model to answer data questions with.
const DEFAULT_MODEL: &str = "llama2";

/// Default timeout for generate requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// Ollama API request/response structures
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Configuration for the Ollama transport.
///
/// Anything deployment-specific (endpoint, model, credentials if a proxy
/// requires them) belongs here, sourced from configuration by the hosting
/// shell; nothing is hard-coded beyond local-development defaults.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// The model to use (e.g., "llama2", "mistral").
    pub model: String,
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OllamaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::default()
    }
}

/// Builder for [`OllamaConfig`].
#[derive(Default)]
pub struct OllamaConfigBuilder {
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl OllamaConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OllamaConfig {
        OllamaConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Blocking Ollama transport for grounded data questions.
///
/// # Example
///
/// ```rust,ignore
/// use analyst_core::grounding::{OllamaConfig, OllamaTransport, PromptGrounder};
///
/// let transport = OllamaTransport::new()?;
/// let answer = PromptGrounder::new().ask(&df, "What is the total?", &transport);
/// ```
pub struct OllamaTransport {
    config: OllamaConfig,
    client: Client,
}

assert_impl_all!(OllamaTransport: Send, Sync);

impl OllamaTransport {
    /// Create a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> std::result::Result<Self, TransportError> {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: OllamaConfig) -> std::result::Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn call_api(&self, prompt: &str) -> std::result::Result<String, TransportError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let result: GenerateResponse = response
            .json()
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        Ok(result.response)
    }
}

impl LlmTransport for OllamaTransport {
    fn generate(&self, prompt: &str) -> std::result::Result<String, TransportError> {
        self.call_api(prompt)
    }

    fn name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

// ============================================================================
// Tests
// ============================================================================
