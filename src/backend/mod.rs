//! Backend abstraction layer for applying appearance profiles to the host.
//!
//! A backend is both the profile catalog (which profiles exist) and the
//! applier (switch the host to one of them), exposed through the
//! [`ProfileBackend`] trait.
//!
//! ## Supported Backends
//!
//! - **GTK Backend**: installed GTK themes, switched with `gsettings`
//! - **Command Backend**: user-provided shell commands for any other host
//!
//! ## Backend Selection
//!
//! - **Explicit**: `backend = "gtk"` or `backend = "command"`
//! - **Auto**: `command` when `apply_command` is configured, otherwise `gtk`
//!   when `gsettings` is on `PATH`, otherwise an error

use anyhow::Result;

use crate::config::{Backend, Config};
use crate::constants::*;
use crate::utils::find_in_path;

pub mod command;
pub mod gtk;

/// A host that knows a set of appearance profiles and can switch to one.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileBackend {
    /// Every profile identifier the host currently knows.
    fn list_profiles(&self) -> Result<Vec<String>>;

    /// Switch the host to `profile`.
    fn apply_profile(&mut self, profile: &str) -> Result<()>;

    /// Nudge the host so that a following `apply_profile(profile)` is
    /// actually picked up. Only called when `force_refresh` is enabled.
    ///
    /// The default implementation does nothing.
    fn force_refresh(&mut self, profile: &str) -> Result<()> {
        let _ = profile;
        Ok(())
    }

    /// Get a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;
}

/// Enumeration of available backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Gtk,
    Command,
}

impl BackendType {
    /// Get the human-readable name for this backend type.
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::Gtk => "GTK",
            BackendType::Command => "Command",
        }
    }
}

/// Resolve the configured backend, running auto-detection if needed.
pub fn detect_backend(config: &Config) -> Result<BackendType> {
    match config.backend.unwrap_or(DEFAULT_BACKEND) {
        Backend::Gtk => Ok(BackendType::Gtk),
        Backend::Command => Ok(BackendType::Command),
        Backend::Auto => {
            if config.apply_command.is_some() {
                Ok(BackendType::Command)
            } else if find_in_path(GSETTINGS_BINARY).is_some() {
                Ok(BackendType::Gtk)
            } else {
                anyhow::bail!(
                    "No usable backend found: '{GSETTINGS_BINARY}' is not installed and no apply_command is configured"
                )
            }
        }
    }
}

/// Create a backend instance for the detected or configured backend type.
pub fn create_backend(
    backend_type: BackendType,
    config: &Config,
    debug_enabled: bool,
) -> Result<Box<dyn ProfileBackend>> {
    match backend_type {
        BackendType::Gtk => Ok(Box::new(gtk::GtkBackend::new(debug_enabled)?)),
        BackendType::Command => Ok(Box::new(command::CommandBackend::new(
            config,
            debug_enabled,
        )?)),
    }
}

/// Detect and create the backend in one step.
pub fn backend_from_config(config: &Config, debug_enabled: bool) -> Result<Box<dyn ProfileBackend>> {
    let backend_type = detect_backend(config)?;
    create_backend(backend_type, config, debug_enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_backend_is_respected() {
        let config = Config {
            backend: Some(Backend::Gtk),
            apply_command: Some("tool {profile}".to_string()),
            ..Default::default()
        };
        assert_eq!(detect_backend(&config).unwrap(), BackendType::Gtk);
    }

    #[test]
    fn test_auto_prefers_configured_command() {
        let config = Config {
            backend: Some(Backend::Auto),
            apply_command: Some("tool {profile}".to_string()),
            profiles: Some(vec!["A".to_string()]),
            ..Default::default()
        };
        assert_eq!(detect_backend(&config).unwrap(), BackendType::Command);
    }

    #[test]
    fn test_default_force_refresh_is_noop() {
        struct Minimal;
        impl ProfileBackend for Minimal {
            fn list_profiles(&self) -> Result<Vec<String>> {
                Ok(Vec::new())
            }
            fn apply_profile(&mut self, _profile: &str) -> Result<()> {
                anyhow::bail!("not expected")
            }
            fn backend_name(&self) -> &'static str {
                "Minimal"
            }
        }
        assert!(Minimal.force_refresh("anything").is_ok());
    }
}
