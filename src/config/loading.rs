//! Configuration loading functionality.
//!
//! Resolves the configuration path, creates the default file on first use,
//! parses and validates the host configuration, then fills in defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::constants::*;
use crate::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], a missing file is an error here.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    apply_defaults(&mut config);

    Ok(config)
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Apply default values to configuration fields.
pub(crate) fn apply_defaults(config: &mut Config) {
    if config.backend.is_none() {
        config.backend = Some(DEFAULT_BACKEND);
    }
    if config.force_refresh.is_none() {
        config.force_refresh = Some(DEFAULT_FORCE_REFRESH);
    }
    if config.check_interval.is_none() {
        config.check_interval = Some(DEFAULT_CHECK_INTERVAL);
    }
    if config.desktop_notifications.is_none() {
        config.desktop_notifications = Some(DEFAULT_DESKTOP_NOTIFICATIONS);
    }

    // Blank optional commands behave as if they were never set
    for command in [
        &mut config.list_command,
        &mut config.refresh_command,
    ] {
        if command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            *command = None;
        }
    }
}
