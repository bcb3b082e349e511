//! Configuration validation functionality.
//!
//! Rejects host configurations that could never drive a backend, such as a
//! command backend without a command or an out-of-range check interval.

use anyhow::Result;

use super::{Backend, Config};
use crate::constants::*;

/// Validate the host half of the configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.check_interval
        && !(MINIMUM_CHECK_INTERVAL..=MAXIMUM_CHECK_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "check_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_CHECK_INTERVAL,
            MAXIMUM_CHECK_INTERVAL
        );
    }

    if let Some(ref profiles) = config.profiles {
        if let Some(index) = profiles.iter().position(|p| p.trim().is_empty()) {
            anyhow::bail!("profiles entry {} is empty", index + 1);
        }
        let mut seen = std::collections::HashSet::new();
        for profile in profiles {
            if !seen.insert(profile.as_str()) {
                anyhow::bail!("profiles lists '{}' more than once", profile);
            }
        }
    }

    let apply_command = config
        .apply_command
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    if config.apply_command.is_some() && apply_command.is_none() {
        anyhow::bail!("apply_command must not be empty");
    }

    if config.backend == Some(Backend::Command) {
        if apply_command.is_none() {
            anyhow::bail!("The command backend requires apply_command to be set");
        }
        if config.profiles.is_none() && config.list_command.is_none() {
            anyhow::bail!(
                "The command backend needs either a profiles list or a list_command"
            );
        }
    }

    Ok(())
}
