//! Integration tests for the aipipe pipeline.
//!
//! Everything up to the network boundary: flag dispatch into a concrete
//! model, prompt composition, and completion post-processing.

#![allow(clippy::unwrap_used, clippy::panic)]

use aipipe::config::Config;
use aipipe::extract::{extract_code_block, strip_think_tags};
use aipipe::prompt::compose;
use aipipe::providers::{Backend, GroqModel, Model, ModelFlags, create_model};

fn test_config() -> Config {
    Config {
        groq_api_key: Some("gsk-test".into()),
        groq_endpoint: Some("https://api.groq.com/openai/v1".into()),
        groq_model: Some("llama-3.3-70b-versatile".into()),
        anthropic_api_key: Some("sk-ant-test".into()),
        openai_api_key: Some("sk-test".into()),
    }
}

#[test]
fn every_flag_combination_resolves_to_one_backend() {
    for haiku in [false, true] {
        for gpt4 in [false, true] {
            for mixtral in [false, true] {
                for llama70b in [false, true] {
                    let backend = Backend::from_flags(ModelFlags {
                        haiku,
                        gpt4,
                        mixtral,
                        llama70b,
                    });

                    let expected = if haiku {
                        Backend::Claude
                    } else if gpt4 {
                        Backend::Gpt4
                    } else if mixtral {
                        Backend::Groq(GroqModel::Mixtral)
                    } else if llama70b {
                        Backend::Groq(GroqModel::Llama70B)
                    } else {
                        Backend::Groq(GroqModel::Default)
                    };

                    assert_eq!(backend, expected);
                }
            }
        }
    }
}

#[test]
fn dispatch_produces_the_advertised_model() {
    let config = test_config();

    let claude = create_model(Backend::Claude, &config);
    assert_eq!(claude.model_id(), "claude-3-haiku-20240307");

    let gpt4 = create_model(Backend::Gpt4, &config);
    assert_eq!(gpt4.model_id(), "gpt-4-0125-preview");

    let groq = create_model(Backend::Groq(GroqModel::Default), &config);
    assert_eq!(groq.model_id(), "llama-3.3-70b-versatile");

    let mixtral = create_model(Backend::Groq(GroqModel::Mixtral), &config);
    assert_eq!(mixtral.model_id(), "mixtral-8x7b-32768");
}

#[test]
fn empty_prompt_fails_before_any_backend_is_consulted() {
    // Provider flags never rescue an empty prompt.
    let result = compose(None, None);
    assert!(result.is_err());

    let result = compose(Some("   "), None);
    assert!(result.is_err());
}

#[test]
fn composed_prompt_flows_through_post_processing() {
    let prompt = compose(Some("context"), Some("question")).unwrap();
    assert_eq!(prompt, "context\n----\nquestion");

    // A reasoning-model response for that prompt, post-processed the
    // way the CLI does it: strip thinking, then extract the block.
    let completion = "<think>user wants a script</think>Here:\n```python\nprint(1)\n```\n";
    let visible = strip_think_tags(completion);
    let block = extract_code_block(visible);

    assert_eq!(block.text, "print(1)");
    assert_eq!(block.language.as_deref(), Some("python"));
}
