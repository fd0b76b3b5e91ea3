//! `mnemo tools` — list the tools the agent can call.

use anyhow::{Context, Result};
use colored::Colorize;

use mnemo_core::config::load_config;

/// Run the tools command.
pub async fn run() -> Result<()> {
    let config = load_config(None);
    let service = crate::build_tool_service(&config);

    let catalog = service.list_tools().await.context("failed to list tools")?;

    println!();
    println!("{}", "🧠 Mnemo Tools".cyan().bold());
    println!();

    if catalog.is_empty() {
        println!("  {}", "(no tools available)".dimmed());
    }

    for tool in &catalog {
        println!("  {}", tool.name.bold());
        if !tool.description.is_empty() {
            // First line of the description is enough for a listing.
            let summary = tool.description.lines().next().unwrap_or_default();
            println!("    {}", summary.dimmed());
        }
    }

    println!();
    Ok(())
}
