//! `OpenAI`-shaped Chat Completions client.
//!
//! Serves two of the dispatch paths: OpenAI itself (GPT-4) and any
//! Groq-compatible endpoint, which speaks the same API shape behind a
//! different base URL.

use super::common::Model;
use crate::error::LlmError;
use crate::prompt::SYSTEM_PROMPT;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default `OpenAI` API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// GPT-4 snapshot used by the `--gpt4` path.
pub const GPT_4_0125_PREVIEW: &str = "gpt-4-0125-preview";

/// Mixtral 8x7B as served by Groq-compatible endpoints (`--mx`).
pub const MIXTRAL_8X7B_32768: &str = "mixtral-8x7b-32768";

/// Llama 3 70B as served by Groq-compatible endpoints (`--l370`).
pub const LLAMA3_70B_8192: &str = "llama3-70b-8192";

/// `OpenAI`-compatible API client for creating completion models.
///
/// # Example
///
/// ```rust,ignore
/// use aipipe::providers::openai::OpenAIClient;
///
/// // Against api.openai.com
/// let client = OpenAIClient::new("sk-...");
///
/// // Against a Groq-compatible endpoint
/// let client = OpenAIClient::builder()
///     .api_key("gsk-...")
///     .base_url("https://api.groq.com/openai/v1")
///     .build();
/// ```
#[derive(Clone)]
pub struct OpenAIClient {
    pub(crate) http_client: reqwest::Client,
    pub(crate) api_key: Arc<str>,
    pub(crate) base_url: Arc<str>,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAIClient {
    /// Create a new client with the given API key and the default
    /// `OpenAI` base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    /// Create a completion model with the specified model ID.
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> CompletionModel {
        CompletionModel::new(self.clone(), model_id)
    }

    /// Get the base URL for API requests.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the authorization headers for API requests.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .expect("Invalid API key format"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for [`OpenAIClient`].
#[derive(Debug, Default)]
pub struct OpenAIClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl OpenAIClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL.
    ///
    /// This is how Groq-compatible endpoints are addressed.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Panics
    ///
    /// Panics if the API key is not set.
    #[must_use]
    pub fn build(self) -> OpenAIClient {
        let api_key = self.api_key.expect("API key is required");
        let base_url = self
            .base_url
            .unwrap_or_else(|| OPENAI_API_BASE_URL.to_string());

        let mut client_builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            client_builder = client_builder.timeout(std::time::Duration::from_secs(timeout));
        }

        let http_client = client_builder.build().expect("Failed to build HTTP client");

        OpenAIClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Chat Completion model for `OpenAI`-shaped APIs.
#[derive(Clone)]
pub struct CompletionModel {
    client: OpenAIClient,
    model_id: String,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("model_id", &self.model_id)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl CompletionModel {
    /// Create a new completion model with no token ceiling.
    pub(crate) fn new(client: OpenAIClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            max_tokens: None,
        }
    }

    /// Set a token ceiling for generated completions.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the request body for the API.
    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = serde_json::json!({
            "model": self.model_id,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        if let Some(max) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }

        body
    }
}

#[async_trait]
impl Model for CompletionModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    #[instrument(skip(self, prompt), fields(model = %self.model_id))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.build_request_body(prompt);

        debug!("sending chat completion request");

        let response = self
            .client
            .http_client
            .post(format!("{}/chat/completions", self.client.base_url))
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::http_status("openai", status.as_u16(), error_text));
        }

        let json: Value = response.json().await?;
        let content = json["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| LlmError::response_format("openai", "no choices in response"))?;

        Ok(content.to_string())
    }
}
