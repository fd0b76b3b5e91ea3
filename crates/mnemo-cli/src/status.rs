//! `mnemo status` — show configuration and backend status.

use anyhow::Result;
use colored::Colorize;

use mnemo_core::config::{get_config_path, load_config};
use mnemo_tools::{HttpToolService, ToolService};

/// Render a configured/not-configured marker.
fn key_status(configured: bool) -> String {
    if configured {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

/// Run the status command.
pub async fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🧠 Mnemo Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Model
    println!("  {:<18} {}", "Model:".bold(), config.agent.model);

    // Parameters
    println!(
        "  {:<18} {} | max_tokens: {} | max_iterations: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.agent.temperature).dimmed(),
        format!("{}", config.agent.max_tokens).dimmed(),
        format!("{}", config.agent.max_turn_iterations).dimmed(),
    );

    // Backends
    println!();
    println!("  {}", "Backends:".bold());
    println!(
        "    {:<20} {}",
        "Completion",
        key_status(config.completion.is_configured())
    );
    println!(
        "    {:<20} {}",
        "Web search",
        key_status(config.search.is_configured())
    );
    println!(
        "    {:<20} {}",
        "Memory",
        key_status(config.memory.is_configured())
    );

    // Tool service
    println!();
    match &config.tool_service.url {
        Some(url) => {
            let service = HttpToolService::new(url.clone());
            let reachable = match service.ping().await {
                Ok(()) => "✓ reachable".green().to_string(),
                Err(e) => format!("{} ({e})", "✗ unreachable".red()),
            };
            println!("  {:<18} {url} {reachable}", "Tool service:".bold());
        }
        None => {
            println!(
                "  {:<18} {}",
                "Tool service:".bold(),
                "in-process (built-in tools)".dimmed()
            );
        }
    }

    println!();

    Ok(())
}
