//! Anthropic Messages API client.

use super::common::{DEFAULT_MAX_TOKENS, Model};
use crate::error::LlmError;
use crate::prompt::SYSTEM_PROMPT;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default Anthropic API base URL.
pub const ANTHROPIC_API_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version 2023-06-01.
pub const ANTHROPIC_VERSION_2023_06_01: &str = "2023-06-01";

/// Latest Anthropic API version.
pub const ANTHROPIC_VERSION_LATEST: &str = ANTHROPIC_VERSION_2023_06_01;

/// Claude 3 Haiku model identifier, used by the `--haiku` path.
pub const CLAUDE_3_HAIKU: &str = "claude-3-haiku-20240307";

/// Anthropic API client for creating completion models.
#[derive(Clone)]
pub struct AnthropicClient {
    pub(crate) http_client: reqwest::Client,
    pub(crate) api_key: Arc<str>,
    pub(crate) base_url: Arc<str>,
    pub(crate) anthropic_version: Arc<str>,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("anthropic_version", &self.anthropic_version)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key.
    ///
    /// Uses the default Anthropic API base URL and latest API version.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> AnthropicClientBuilder {
        AnthropicClientBuilder::default()
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

    /// Build the headers for API requests.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).expect("Invalid API key format"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.anthropic_version).expect("Invalid version format"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers
    }
}

/// Builder for [`AnthropicClient`].
#[derive(Debug)]
pub struct AnthropicClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    anthropic_version: String,
    timeout_secs: Option<u64>,
}

impl Default for AnthropicClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            anthropic_version: ANTHROPIC_VERSION_LATEST.to_string(),
            timeout_secs: None,
        }
    }
}

impl AnthropicClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the Anthropic API version.
    #[must_use]
    pub fn anthropic_version(mut self, version: impl Into<String>) -> Self {
        self.anthropic_version = version.into();
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
    pub fn build(self) -> AnthropicClient {
        let api_key = self.api_key.expect("API key is required");
        let base_url = self
            .base_url
            .unwrap_or_else(|| ANTHROPIC_API_BASE_URL.to_string());

        let mut client_builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            client_builder = client_builder.timeout(std::time::Duration::from_secs(timeout));
        }

        let http_client = client_builder.build().expect("Failed to build HTTP client");

        AnthropicClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            anthropic_version: self.anthropic_version.into(),
        }
    }
}

/// Completion model for Anthropic's Messages API.
#[derive(Clone)]
pub struct CompletionModel {
    client: AnthropicClient,
    model_id: String,
    max_tokens: u32,
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
    /// Create a new completion model with the default token ceiling.
    pub(crate) fn new(client: AnthropicClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the token ceiling for generated completions.
    ///
    /// The Messages API requires a ceiling on every request.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the request body for the API.
    fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model_id,
            "max_tokens": self.max_tokens,
            "system": SYSTEM_PROMPT,
            "messages": [
                { "role": "user", "content": prompt },
            ],
        })
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

        debug!("sending messages request");

        let response = self
            .client
            .http_client
            .post(format!("{}/v1/messages", self.client.base_url))
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::http_status(
                "anthropic",
                status.as_u16(),
                error_text,
            ));
        }

        let json: Value = response.json().await?;
        let text = json["content"]
            .get(0)
            .and_then(|block| block["text"].as_str())
            .ok_or_else(|| LlmError::response_format("anthropic", "no text content in response"))?;

        Ok(text.to_string())
    }
}
