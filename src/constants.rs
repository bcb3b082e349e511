//! Application-wide constants and defaults.

use crate::config::Backend;

// # Files and paths

pub const CONFIG_DIR_NAME: &str = "themeshift";
pub const CONFIG_FILE_NAME: &str = "themeshift.toml";
pub const LOCK_FILE_NAME: &str = "themeshift.lock";

// # Defaults

pub const DEFAULT_BACKEND: Backend = Backend::Auto;
pub const DEFAULT_CHECK_INTERVAL: u64 = 60; // seconds
pub const DEFAULT_FORCE_REFRESH: bool = false;
pub const DEFAULT_DESKTOP_NOTIFICATIONS: bool = true;
pub const DEFAULT_SHOW_NOTIFICATIONS: bool = true;

// # Validation limits

pub const MINIMUM_CHECK_INTERVAL: u64 = 1;
pub const MAXIMUM_CHECK_INTERVAL: u64 = 3600;
pub const MINIMUM_HOUR: u8 = 0;
pub const MAXIMUM_HOUR: u8 = 23;

// # Decision core

/// Upper bound on setup passes within one `ensure_configured` call.
pub const MAX_SETUP_PASSES: usize = 3;

// # Settings watcher

/// Editors often write a file in several steps; events closer together than
/// this collapse into one reload.
pub const SETTINGS_DEBOUNCE_MS: u64 = 500;

// # GTK backend

pub const GSETTINGS_BINARY: &str = "gsettings";
pub const GTK_INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
pub const GTK_THEME_KEY: &str = "gtk-theme";
pub const DEFAULT_XDG_DATA_DIRS: &str = "/usr/local/share:/usr/share";

// # Notifications

pub const NOTIFY_SEND_BINARY: &str = "notify-send";

// # Exit codes

pub const EXIT_FAILURE: i32 = 1;
