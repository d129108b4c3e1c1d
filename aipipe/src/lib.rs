//! Aipipe - pipe text through large-language-model completion APIs.
//!
//! This crate holds everything behind the `aipipe` command line: reading
//! configuration from the environment (with an optional user config file),
//! composing a prompt from piped input and command-line text, dispatching
//! a single completion request to one of the supported backends, and
//! post-processing the response (think-tag stripping, fenced code-block
//! extraction).

pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod providers;

pub use error::{Error, LlmError, Result};
