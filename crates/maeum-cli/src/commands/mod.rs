//! Command implementations for `maeum`.
//!
//! - [`chat`] -- interactive session or single-message mode
//! - [`status`] -- backend health check

pub mod chat;
pub mod status;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use maeum_types::config::Config;

/// Discover the config file path.
///
/// 1. `MAEUM_CONFIG` environment variable
/// 2. `~/.maeum/config.json`, if it exists
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MAEUM_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let candidate = dirs::home_dir()?.join(".maeum").join("config.json");
    candidate.exists().then_some(candidate)
}

/// Load configuration from the given path or via discovery, then apply
/// environment overrides and validate.
///
/// Returns the default config if no file is found.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let path = match config_override {
        Some(p) => {
            let path = PathBuf::from(p);
            if !path.exists() {
                anyhow::bail!("config file not found: {p}");
            }
            Some(path)
        }
        None => discover_config_path(),
    };

    let mut config = match path {
        Some(path) => read_config(&path)?,
        None => {
            info!("no config file found, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    debug!(path = %path.display(), "loading config file");
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))
}

/// `MAEUM_BACKEND_URL` and `MAEUM_TIMEOUT_SECS` win over the file.
pub fn apply_env_overrides(config: &mut Config) -> anyhow::Result<()> {
    if let Ok(url) = std::env::var("MAEUM_BACKEND_URL")
        && !url.trim().is_empty()
    {
        config.backend.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Ok(raw) = std::env::var("MAEUM_TIMEOUT_SECS") {
        config.backend.timeout_secs = raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("MAEUM_TIMEOUT_SECS must be an integer, got {raw:?}"))?;
    }
    Ok(())
}
