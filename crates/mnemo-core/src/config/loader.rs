//! Config loader — reads `~/.mnemo/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.mnemo/config.json`
//! 3. Environment variables `MNEMO_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `MNEMO_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
fn apply_env_overrides(mut config: Config) -> Config {
    // Agent
    if let Ok(val) = std::env::var("MNEMO_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Ok(val) = std::env::var("MNEMO_AGENT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("MNEMO_AGENT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.agent.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("MNEMO_AGENT__MAX_TURN_ITERATIONS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_turn_iterations = n;
        }
    }

    // Completion service
    if let Ok(val) = std::env::var("MNEMO_COMPLETION__API_KEY") {
        config.completion.api_key = val;
    }
    if let Ok(val) = std::env::var("MNEMO_COMPLETION__API_BASE") {
        config.completion.api_base = Some(val);
    }

    // Tool execution service
    if let Ok(val) = std::env::var("MNEMO_TOOL_SERVICE__URL") {
        config.tool_service.url = Some(val);
    }

    // Search backend
    if let Ok(val) = std::env::var("MNEMO_SEARCH__API_KEY") {
        config.search.api_key = val;
    }

    // Memory backend
    if let Ok(val) = std::env::var("MNEMO_MEMORY__API_KEY") {
        config.memory.api_key = val;
    }
    if let Ok(val) = std::env::var("MNEMO_MEMORY__ORG_ID") {
        config.memory.org_id = Some(val);
    }
    if let Ok(val) = std::env::var("MNEMO_MEMORY__PROJECT_ID") {
        config.memory.project_id = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
