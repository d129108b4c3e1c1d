//! Completion post-processing.
//!
//! Two transforms run over the raw completion text before it reaches
//! stdout: stripping a leading `<think>` block emitted by reasoning
//! models, and (on request) isolating the contents of a Markdown fenced
//! code block. Both fall back to the input unchanged rather than failing.

use regex::Regex;
use std::sync::LazyLock;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([a-zA-Z0-9.]*)\n([\s\S]+?)\n```").expect("valid regex"));

/// A code block extracted from a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// The text inside the fences, or the whole completion when no
    /// fenced block was found.
    pub text: String,
    /// Language tag after the opening fence, if one was present.
    pub language: Option<String>,
}

/// Extract the first Markdown fenced code block from a completion.
///
/// When the completion contains no fenced block, the original text is
/// returned unchanged with no language tag.
#[must_use]
pub fn extract_code_block(completion: &str) -> CodeBlock {
    match CODE_BLOCK_RE.captures(completion) {
        Some(caps) => CodeBlock {
            text: caps[2].to_string(),
            language: caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|tag| !tag.is_empty())
                .map(String::from),
        },
        None => CodeBlock {
            text: completion.to_string(),
            language: None,
        },
    }
}

/// Strip a leading `<think>...</think>` block from a completion.
///
/// Reasoning models prefix their answer with an inline thinking section.
/// Text that does not start with `<think>`, or whose think block is
/// never closed, is returned unchanged.
#[must_use]
pub fn strip_think_tags(completion: &str) -> &str {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let Some(rest) = completion.strip_prefix(OPEN) else {
        return completion;
    };

    match rest.find(CLOSE) {
        Some(idx) => &rest[idx + CLOSE.len()..],
        None => completion,
    }
}
