//! Configuration system for themeshift.
//!
//! A single TOML file holds both the host configuration (which backend to
//! drive, how often to check) and the user's schedule settings. This module
//! owns the host half; the schedule half is read and written key by key
//! through [`crate::settings::FileSettingsStore`], which lets the setup flow
//! persist each answer independently.
//!
//! ## Configuration Sources
//!
//! 1. `--config <dir>` on the command line (`<dir>/themeshift.toml`)
//! 2. **XDG_CONFIG_HOME**/themeshift/themeshift.toml
//!
//! A commented default file is created on first load.
//!
//! ## Configuration Structure
//!
//! ```toml
//! #[Backend]
//! backend = "auto"              # "auto", "gtk" or "command"
//! force_refresh = false         # Briefly apply another profile before switching
//! check_interval = 60           # Seconds between scheduled checks (1-3600)
//!
//! #[Command backend]
//! # apply_command = "my-theme-tool set {profile}"
//! # list_command = "my-theme-tool list"
//! # profiles = ["Light", "Dark"]
//!
//! #[Notifications]
//! desktop_notifications = true  # Send notifications through notify-send
//! show_notifications = true     # Notify after each successful switch
//!
//! #[Schedule]
//! light_profile = "Adwaita"
//! dark_profile = "Adwaita-dark"
//! start_hour = 8                # Light profile from this hour (0-23)
//! end_hour = 20                 # Dark profile from this hour (0-23)
//! ```

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use watcher::start_settings_watcher;

/// Which host mechanism applies profiles.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `command` when `apply_command` is set, otherwise `gtk` if available.
    Auto,
    /// GTK themes switched through `gsettings`.
    Gtk,
    /// User-provided shell commands.
    Command,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Gtk => "gtk",
            Backend::Command => "command",
        }
    }
}

/// Host configuration loaded from `themeshift.toml`.
///
/// Every field is optional in the file; `loading::apply_defaults` fills the
/// gaps after validation. Schedule keys living in the same file are ignored
/// here.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    pub backend: Option<Backend>,
    /// Run the backend's refresh hook before every real switch.
    pub force_refresh: Option<bool>,
    pub check_interval: Option<u64>, // seconds
    /// Route notifications through `notify-send` in addition to the log.
    pub desktop_notifications: Option<bool>,

    // Command backend
    pub profiles: Option<Vec<String>>,
    pub list_command: Option<String>,
    pub apply_command: Option<String>,
    pub refresh_command: Option<String>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL))
    }

    pub fn force_refresh(&self) -> bool {
        self.force_refresh.unwrap_or(DEFAULT_FORCE_REFRESH)
    }

    pub fn desktop_notifications(&self) -> bool {
        self.desktop_notifications
            .unwrap_or(DEFAULT_DESKTOP_NOTIFICATIONS)
    }

    /// True when two configs would build a different backend.
    pub fn backend_changed(&self, other: &Config) -> bool {
        self.backend != other.backend
            || self.profiles != other.profiles
            || self.list_command != other.list_command
            || self.apply_command != other.apply_command
            || self.refresh_command != other.refresh_command
    }

    pub fn log_config(&self, backend_name: &str) {
        log_block_start!("Loaded configuration");
        let backend = self.backend.unwrap_or(DEFAULT_BACKEND);
        if backend == Backend::Auto {
            log_indented!("Backend: Auto ({})", backend_name);
        } else {
            log_indented!("Backend: {}", backend_name);
        }
        log_indented!("Check interval: {} seconds", self.check_interval().as_secs());
        if self.force_refresh() {
            log_indented!("Force refresh: enabled");
        }
        if !self.desktop_notifications() {
            log_indented!("Desktop notifications: disabled");
        }
    }
}
