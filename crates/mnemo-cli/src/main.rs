//! Mnemo CLI — entry point.
//!
//! # Commands
//!
//! - `mnemo chat [-m MESSAGE]` — chat with the agent (single-shot or REPL)
//! - `mnemo tools` — list the tools the agent can call
//! - `mnemo status` — show configuration and backend status
//! - `mnemo onboard` — initialize config

mod helpers;
mod onboard;
mod repl;
mod status;
mod tools_cmd;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mnemo_agent::context::build_system_prompt;
use mnemo_agent::{to_tool_definitions, TurnInterrupt, TurnRunner};
use mnemo_core::config::{load_config, Config};
use mnemo_core::SessionState;
use mnemo_providers::{ChatClient, CompletionProvider, RequestConfig};
use mnemo_tools::{default_registry, HttpToolService, LocalToolService, ToolService};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🧠 Mnemo — memory-centric AI assistant in Rust
#[derive(Parser)]
#[command(name = "mnemo", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List the tools the agent can call
    Tools,

    /// Show configuration and backend status
    Status,

    /// Initialize configuration
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, logs } => {
            init_logging(logs);
            run_chat(message).await
        }
        Commands::Tools => {
            init_logging(false);
            tools_cmd::run().await
        }
        Commands::Status => {
            init_logging(false);
            status::run().await
        }
        Commands::Onboard => onboard::run(),
    }
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the tool service from config: remote host when a URL is configured,
/// the built-in registry otherwise.
pub(crate) fn build_tool_service(config: &Config) -> Arc<dyn ToolService> {
    match &config.tool_service.url {
        Some(url) => Arc::new(HttpToolService::new(url.clone())),
        None => Arc::new(LocalToolService::new(default_registry(config))),
    }
}

/// Run the chat command: wire services, discover tools, drive turns.
async fn run_chat(message: Option<String>) -> Result<()> {
    let config = load_config(None);

    if !config.completion.is_configured() {
        anyhow::bail!(
            "No completion API key configured. Run `mnemo onboard`, then set \
             completion.apiKey in the config (or MNEMO_COMPLETION__API_KEY)."
        );
    }

    let provider: Arc<dyn CompletionProvider> =
        Arc::new(ChatClient::new(&config.completion, &config.agent.model));

    let service = build_tool_service(&config);
    service
        .ping()
        .await
        .context("tool service is unreachable")?;

    // Discovery happens once; the schema snapshot is fixed for the session.
    let catalog = service.list_tools().await.context("failed to list tools")?;
    let tool_definitions = to_tool_definitions(&catalog);
    info!(
        tools = %catalog
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        "available tools"
    );

    // Ctrl-C during a running turn requests a stop between iterations;
    // an in-flight tool call is left to finish.
    let interrupt = TurnInterrupt::new();
    {
        let handle = interrupt.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                handle.trigger();
            }
        });
    }

    let request_config = RequestConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
    };

    let runner = TurnRunner::new(
        provider,
        service,
        tool_definitions,
        &config.agent.model,
        request_config,
        Some(config.agent.max_turn_iterations),
    )
    .with_interrupt(interrupt.clone());

    let mut session = SessionState::new(build_system_prompt(&config.agent.name));
    info!(run_id = session.run_id(), "session started");

    match message {
        Some(text) => {
            let answer = runner.run_turn(&mut session, &text).await;
            println!("{answer}");
            Ok(())
        }
        None => repl::run(runner, session, interrupt, catalog.len()).await,
    }
}
