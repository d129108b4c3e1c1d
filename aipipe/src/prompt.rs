//! Prompt composition.
//!
//! The prompt for a run comes from piped standard input, a command-line
//! argument, or both. When both are present they are joined with a
//! literal separator line so the model sees the piped text as context
//! for the question.

use crate::error::{Error, Result};

/// System instruction sent on every completion request, regardless of
/// which backend serves it.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. \
If the user merely asked a question, do not use a code block. \
If the user has asked for something written, put it in a code block (```).";

/// Separator inserted between piped input and the command-line prompt.
pub const SOURCE_SEPARATOR: &str = "\n----\n";

/// Compose the prompt from piped input and/or a command-line argument.
///
/// # Errors
///
/// Returns [`Error::Prompt`] when the composed prompt is empty or
/// consists only of whitespace.
pub fn compose(piped: Option<&str>, arg: Option<&str>) -> Result<String> {
    let prompt = match (piped, arg) {
        (Some(piped), Some(arg)) => format!("{piped}{SOURCE_SEPARATOR}{arg}"),
        (Some(source), None) | (None, Some(source)) => source.to_string(),
        (None, None) => String::new(),
    };

    if prompt.trim().is_empty() {
        return Err(Error::prompt("no prompt provided"));
    }

    Ok(prompt)
}
