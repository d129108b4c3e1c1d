//! Shared abstractions for completion backends.

use crate::error::LlmError;
use async_trait::async_trait;

/// Token ceiling applied to completion requests on the backends that
/// take one (Claude and the Groq-compatible endpoint; the GPT-4 path
/// sends no ceiling).
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// A completion backend.
///
/// One implementation per remote API shape. A single invocation issues
/// exactly one request; there is no streaming, no multi-choice handling
/// and no retry.
#[async_trait]
pub trait Model: Send + Sync {
    /// The model identifier sent to the API (e.g. "gpt-4-0125-preview").
    fn model_id(&self) -> &str;

    /// Request one completion for `prompt` and return its text payload.
    ///
    /// The shared system instruction is sent alongside the prompt on
    /// every path.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] when the request fails or the response
    /// does not carry a text payload. Errors are surfaced as-is; the
    /// caller does not retry.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
