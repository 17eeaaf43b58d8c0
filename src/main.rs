//! tai - a terminal AI assistant.
//!
//! Translates a natural-language query into a single shell command for the
//! local platform, shows it, and optionally executes it or copies it to the
//! clipboard. One query per process, no state between invocations.

mod config;
mod executor;
mod gemini;
mod interact;
mod platform;
mod prompt;
mod suggestion;

use anyhow::{Context, Result};
use clap::Parser;
use executor::ShellStrategy;
use platform::Platform;
use suggestion::Rejection;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tai")]
#[command(author, version, about = "A terminal AI assistant")]
#[command(long_about = "Translates natural language into shell commands.\n\nExample: tai list hidden files")]
struct Cli {
    /// The natural-language query; all words are joined into one request
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    query: Vec<String>,

    /// Offer to copy the suggested command instead of executing it
    #[arg(long)]
    copy: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tai=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.query.is_empty() {
        eprintln!("Usage: tai <query>");
        std::process::exit(1);
    }
    let query = cli.query.join(" ");

    // Interrupt is a normal termination: clean message, exit 0. Racing the
    // whole pipeline keeps every exit path inside scoped cleanup.
    let code = tokio::select! {
        result = run(&query, cli.copy) => match result {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {e:#}");
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted. Exiting.");
            0
        }
    };
    std::process::exit(code);
}

/// The whole query pipeline: detect platform, build prompt, ask the model,
/// validate, confirm, act. Only configuration failures bubble up as errors.
async fn run(query: &str, copy_mode: bool) -> Result<()> {
    let config = config::Config::load()?;
    let api_config = config.api_config().context("Configuration error")?;

    // Probed once; prompt, validator and shell strategy all see this value.
    let local = Platform::detect();
    let strategy = ShellStrategy::for_platform(local);
    info!("Platform: {local}, model: {}", config.api.model);

    let client = gemini::GeminiClient::new(api_config)?;
    let system_prompt = prompt::build_prompt(local);

    let raw = client.suggest(&system_prompt, query).await;
    if raw.is_empty() {
        eprintln!("No suggestion available.");
        return Ok(());
    }

    let suggestion = match suggestion::parse(&raw, local) {
        Ok(s) => s,
        Err(rejection) => {
            report_rejection(&rejection, local);
            return Ok(());
        }
    };

    interact::display_suggestion(&suggestion);
    let mut input = BufReader::new(tokio::io::stdin());
    if copy_mode {
        interact::confirm_and_copy(&suggestion, &mut input).await
    } else {
        interact::confirm_and_run(&suggestion, &strategy, &mut input).await
    }
}

/// A distinct user-visible message per rejection case. Rejections never
/// change the exit status.
fn report_rejection(rejection: &Rejection, local: Platform) {
    match rejection {
        Rejection::InvalidFormat => {
            eprintln!("Error: invalid response format from the model.");
        }
        Rejection::NotRecognized => {
            eprintln!("Command not recognized.");
        }
        Rejection::PlatformMismatch { declared } => {
            eprintln!(
                "The model answered for '{declared}' but this machine is '{local}'. \
                 Discarding the suggestion."
            );
        }
        Rejection::EmptyFields => {
            eprintln!("The model returned an incomplete suggestion.");
        }
    }
}
