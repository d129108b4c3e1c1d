//! Completion backends and flag-driven dispatch.
//!
//! Exactly one backend serves a given invocation, selected from parsed
//! flags with fixed precedence: Claude, then GPT-4, then the
//! Groq-compatible endpoint. Within the Groq path, `--mx` outranks
//! `--l370`, which outranks the `GROQ_MODEL` default. Conflicting flag
//! combinations resolve silently by that precedence.

pub mod anthropic;
mod common;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use common::{DEFAULT_MAX_TOKENS, Model};
pub use openai::OpenAIClient;

use crate::config::Config;
use crate::error::LlmError;
use async_trait::async_trait;
use tracing::info;

/// Model override for the Groq-compatible path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroqModel {
    /// Model named by `GROQ_MODEL`.
    #[default]
    Default,
    /// Mixtral 8x7B (`--mx`).
    Mixtral,
    /// Llama 3 70B (`--l370`).
    Llama70B,
}

/// Completion backend for a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Anthropic Claude (`--haiku`).
    Claude,
    /// OpenAI GPT-4 (`--gpt4`).
    Gpt4,
    /// Groq-compatible endpoint (default).
    Groq(GroqModel),
}

/// Provider-selection flags as parsed from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelFlags {
    /// `--haiku`: use Anthropic Claude.
    pub haiku: bool,
    /// `--gpt4`: use OpenAI GPT-4.
    pub gpt4: bool,
    /// `--mx`: use Mixtral on the Groq-compatible endpoint.
    pub mixtral: bool,
    /// `--l370`: use Llama 3 70B on the Groq-compatible endpoint.
    pub llama70b: bool,
}

impl Backend {
    /// Resolve the backend from parsed flags.
    #[must_use]
    pub fn from_flags(flags: ModelFlags) -> Self {
        if flags.haiku {
            Self::Claude
        } else if flags.gpt4 {
            Self::Gpt4
        } else if flags.mixtral {
            Self::Groq(GroqModel::Mixtral)
        } else if flags.llama70b {
            Self::Groq(GroqModel::Llama70B)
        } else {
            Self::Groq(GroqModel::Default)
        }
    }
}

/// A concrete completion model behind one of the supported backends.
#[derive(Debug, Clone)]
pub enum ModelProvider {
    /// Anthropic Messages API.
    Anthropic(anthropic::CompletionModel),
    /// `OpenAI`-shaped Chat Completions API (OpenAI itself or a
    /// Groq-compatible endpoint).
    OpenAI(openai::CompletionModel),
}

#[async_trait]
impl Model for ModelProvider {
    fn model_id(&self) -> &str {
        match self {
            Self::Anthropic(m) => m.model_id(),
            Self::OpenAI(m) => m.model_id(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        match self {
            Self::Anthropic(m) => m.complete(prompt).await,
            Self::OpenAI(m) => m.complete(prompt).await,
        }
    }
}

/// Create the completion model for `backend` from the resolved
/// configuration.
///
/// Credentials are passed through as-is; a missing key is sent as an
/// empty credential and surfaces as an authentication failure from the
/// remote API rather than a local error.
#[must_use]
pub fn create_model(backend: Backend, config: &Config) -> ModelProvider {
    match backend {
        Backend::Claude => {
            info!(model = anthropic::CLAUDE_3_HAIKU, "using Anthropic backend");
            let api_key = config.anthropic_api_key.clone().unwrap_or_default();
            ModelProvider::Anthropic(
                AnthropicClient::new(api_key).completion_model(anthropic::CLAUDE_3_HAIKU),
            )
        }
        Backend::Gpt4 => {
            info!(model = openai::GPT_4_0125_PREVIEW, "using OpenAI backend");
            let api_key = config.openai_api_key.clone().unwrap_or_default();
            ModelProvider::OpenAI(
                OpenAIClient::new(api_key).completion_model(openai::GPT_4_0125_PREVIEW),
            )
        }
        Backend::Groq(model) => {
            let model_id = match model {
                GroqModel::Mixtral => openai::MIXTRAL_8X7B_32768,
                GroqModel::Llama70B => openai::LLAMA3_70B_8192,
                GroqModel::Default => config.groq_model.as_deref().unwrap_or_default(),
            };
            info!(model = model_id, "using Groq-compatible backend");

            let mut builder =
                OpenAIClient::builder().api_key(config.groq_api_key.clone().unwrap_or_default());
            if let Some(endpoint) = &config.groq_endpoint {
                builder = builder.base_url(endpoint);
            }

            ModelProvider::OpenAI(
                builder
                    .build()
                    .completion_model(model_id)
                    .with_max_tokens(DEFAULT_MAX_TOKENS),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_selects_groq_default() {
        let backend = Backend::from_flags(ModelFlags::default());
        assert_eq!(backend, Backend::Groq(GroqModel::Default));
    }

    #[test]
    fn claude_outranks_all_other_flags() {
        let backend = Backend::from_flags(ModelFlags {
            haiku: true,
            gpt4: true,
            mixtral: true,
            llama70b: true,
        });
        assert_eq!(backend, Backend::Claude);
    }

    #[test]
    fn gpt4_outranks_groq_overrides() {
        let backend = Backend::from_flags(ModelFlags {
            gpt4: true,
            mixtral: true,
            llama70b: true,
            ..ModelFlags::default()
        });
        assert_eq!(backend, Backend::Gpt4);
    }

    #[test]
    fn mixtral_outranks_llama() {
        let backend = Backend::from_flags(ModelFlags {
            mixtral: true,
            llama70b: true,
            ..ModelFlags::default()
        });
        assert_eq!(backend, Backend::Groq(GroqModel::Mixtral));
    }

    #[test]
    fn groq_endpoint_override_is_applied() {
        let config = Config {
            groq_api_key: Some("gsk-test".into()),
            groq_endpoint: Some("https://api.groq.com/openai/v1".into()),
            groq_model: Some("llama-3.3-70b-versatile".into()),
            ..Config::default()
        };

        let model = create_model(Backend::Groq(GroqModel::Default), &config);
        assert_eq!(model.model_id(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn groq_overrides_ignore_groq_model_env() {
        let config = Config {
            groq_model: Some("llama-3.3-70b-versatile".into()),
            ..Config::default()
        };

        let mx = create_model(Backend::Groq(GroqModel::Mixtral), &config);
        assert_eq!(mx.model_id(), "mixtral-8x7b-32768");

        let llama = create_model(Backend::Groq(GroqModel::Llama70B), &config);
        assert_eq!(llama.model_id(), "llama3-70b-8192");
    }

    #[test]
    fn claude_backend_uses_haiku_model() {
        let model = create_model(Backend::Claude, &Config::default());
        assert_eq!(model.model_id(), "claude-3-haiku-20240307");
        assert!(matches!(model, ModelProvider::Anthropic(_)));
    }

    #[test]
    fn gpt4_backend_uses_preview_snapshot() {
        let model = create_model(Backend::Gpt4, &Config::default());
        assert_eq!(model.model_id(), "gpt-4-0125-preview");
        assert!(matches!(model, ModelProvider::OpenAI(_)));
    }
}
