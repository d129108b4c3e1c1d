//! Aipipe CLI - pipe text through large-language-model completion APIs.
//!
//! Reads a prompt from piped standard input and/or the command line,
//! sends it to one completion backend, and writes the response (or just
//! its fenced code block) to standard output.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use aipipe::config::Config;
use aipipe::extract::{extract_code_block, strip_think_tags};
use aipipe::prompt::compose;
use aipipe::providers::{Backend, Model, ModelFlags, create_model};
use aipipe::{Error, Result};
use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Pipe text through large-language-model completion APIs
#[derive(Parser)]
#[command(name = "aipipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The prompt to generate a completion for (optional when input is
    /// piped; multiple words are joined with spaces)
    prompt: Vec<String>,

    /// Return only the fenced code block from the completion
    #[arg(long, visible_alias = "cb")]
    codeblock: bool,

    /// Use Anthropic's Claude model
    #[arg(long)]
    haiku: bool,

    /// Use the Mixtral 8x7B model on the Groq-compatible endpoint
    #[arg(long)]
    mx: bool,

    /// Use the Llama 3 70B model on the Groq-compatible endpoint
    #[arg(long)]
    l370: bool,

    /// Use OpenAI GPT-4
    #[arg(long)]
    gpt4: bool,

    /// Keep the model's `<think>` section in the output
    #[arg(long)]
    thinking: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    if std::env::args().len() < 2 {
        println!("Usage: aipipe \"query\" > output.txt");
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Diagnostics go to stderr so they never mix with the completion text
/// on stdout.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aipipe_cli={level},aipipe={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point: compose, dispatch, post-process, print.
async fn run(cli: Cli) -> Result<()> {
    let piped = read_piped_input()?;
    let arg = (!cli.prompt.is_empty()).then(|| cli.prompt.join(" "));
    let prompt = compose(piped.as_deref(), arg.as_deref())?;

    let config = Config::load().await;
    let backend = Backend::from_flags(ModelFlags {
        haiku: cli.haiku,
        gpt4: cli.gpt4,
        mixtral: cli.mx,
        llama70b: cli.l370,
    });
    let model = create_model(backend, &config);

    let completion = model.complete(&prompt).await.map_err(Error::from)?;

    let answer = if cli.thinking {
        completion.as_str()
    } else {
        strip_think_tags(&completion)
    };

    let output = if cli.codeblock {
        extract_code_block(answer).text
    } else {
        answer.to_string()
    };

    let mut stdout = std::io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Read standard input when it is not an interactive terminal.
fn read_piped_input() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut input = String::new();
    stdin.read_to_string(&mut input)?;
    Ok(Some(input))
}
