//! Error types for aipipe.
//!
//! The taxonomy is deliberately small: a prompt error for empty input,
//! an [`LlmError`] for anything that goes wrong talking to a completion
//! API, and I/O errors from reading standard input. Remote failures are
//! surfaced once and terminate the run; there is no retry policy and no
//! distinction between transient and permanent failures.

use std::fmt;

/// Result type alias for aipipe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for aipipe.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The composed prompt was empty or unusable.
    #[error("{0}")]
    Prompt(String),

    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a prompt error with a message.
    #[must_use]
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }
}

/// Error type for LLM provider operations.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmError {
    /// The error kind.
    pub kind: LlmErrorKind,
    /// The provider name (e.g. "openai", "anthropic").
    pub provider: Option<String>,
    /// Additional error message.
    pub message: String,
    /// Optional error code from the provider.
    pub code: Option<String>,
}

/// Categories of LLM errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LlmErrorKind {
    /// Network or connection error.
    Network,
    /// Non-success HTTP status from the provider.
    HttpStatus,
    /// The response did not have the expected shape.
    ResponseFormat,
}

impl LlmError {
    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::Network,
            provider: None,
            message: message.into(),
            code: None,
        }
    }

    /// Create an HTTP status error from a provider response.
    #[must_use]
    pub fn http_status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::HttpStatus,
            provider: Some(provider.into()),
            message: format!("HTTP {status}: {}", body.into()),
            code: Some(status.to_string()),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: LlmErrorKind::ResponseFormat,
            provider: Some(provider.into()),
            message: message.into(),
            code: None,
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn prompt_creates_error() {
        let err = Error::prompt("no prompt provided");
        assert!(matches!(err, Error::Prompt(_)));
        assert_eq!(err.to_string(), "no prompt provided");
    }

    #[test]
    fn from_llm_error() {
        let llm_err = LlmError::network("timeout");
        let err: Error = llm_err.into();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn http_status_creates_error() {
        let err = LlmError::http_status("openai", 401, "Unauthorized");
        assert_eq!(err.kind, LlmErrorKind::HttpStatus);
        assert_eq!(err.provider.as_deref(), Some("openai"));
        assert!(err.message.contains("401"));
        assert_eq!(err.code.as_deref(), Some("401"));
    }

    #[test]
    fn response_format_creates_error() {
        let err = LlmError::response_format("anthropic", "no text content in response");
        assert_eq!(err.kind, LlmErrorKind::ResponseFormat);
        assert_eq!(err.provider.as_deref(), Some("anthropic"));
    }

    #[test]
    fn display_with_provider() {
        let err = LlmError::http_status("openai", 429, "Too Many Requests");
        let s = err.to_string();
        assert!(s.contains("[openai]"));
        assert!(s.contains("429"));
    }

    #[test]
    fn display_without_provider() {
        let err = LlmError::network("connection refused");
        let s = err.to_string();
        assert!(!s.contains('['));
        assert!(s.contains("connection refused"));
    }

    #[test]
    fn error_chain_llm_to_error() {
        fn inner() -> std::result::Result<(), LlmError> {
            Err(LlmError::network("test"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let result = outer();
        assert!(matches!(result.unwrap_err(), Error::Llm(_)));
    }
}
