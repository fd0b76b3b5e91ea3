//! `mnemo onboard` — initialize configuration.
//!
//! Creates `~/.mnemo/config.json` with defaults and the data directories.

use anyhow::Result;
use colored::Colorize;

use mnemo_core::config::{get_config_path, load_config, save_config};
use mnemo_core::utils::get_data_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🧠 Mnemo — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    // 1. Create config if it doesn't exist
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults + env overrides
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Ensure history directory
    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!(
        "{}",
        "  Setup complete! Add your API keys to the config, then run `mnemo chat`.".green()
    );
    println!();

    Ok(())
}
