//! # Themeshift Library
//!
//! Internal library for the themeshift binary application
//!
//! This library exists to enable testing of the decision core and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Themeshift` struct runs the daemon with resource management
//! - **Core Logic**: `core` module decides between the light and dark profile and
//!   applies it once per change
//! - **Backends**: `backend` module with GTK (`gsettings`) and shell-command support
//! - **Settings**: `settings` module persisting the schedule key by key
//! - **Configuration**: `config` module for TOML-based host settings with hot-reload
//! - **Commands**: `commands` module for CLI subcommands (switch, configure, status, ...)
//! - **Infrastructure**: Signal handling, lock file, prompts, notifications, logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod io;
pub mod notification;
pub mod prompt;
pub mod settings;
pub mod signals;
pub mod time_source;
pub mod utils;

#[cfg(feature = "testing-support")]
pub mod testing;

mod themeshift;

// Re-export for binary
pub use themeshift::{Themeshift, create_core, report_cycle};
