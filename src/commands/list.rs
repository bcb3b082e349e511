//! List command: every profile the configured backend knows.

use anyhow::{Context, Result};

use crate::backend::backend_from_config;
use crate::config::Config;
use crate::settings::{FileSettingsStore, PartialSchedule};

/// Handle the list command
pub fn handle_list_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    super::find_daemon()?;
    let config = Config::load().context("Failed to load configuration")?;
    let backend = backend_from_config(&config, debug_enabled)?;
    let profiles = backend.list_profiles()?;
    let schedule = PartialSchedule::read(&FileSettingsStore::from_config_path()?)?;

    if profiles.is_empty() {
        log_block_start!("The {} backend reports no profiles", backend.backend_name());
        log_end!();
        return Ok(());
    }

    log_block_start!("{} profiles ({}):", backend.backend_name(), profiles.len());
    for profile in &profiles {
        log_indented!("{}", label(profile, &schedule));
    }
    log_end!();
    Ok(())
}

/// Profile name, marked when it is the configured light or dark profile.
fn label(profile: &str, schedule: &PartialSchedule) -> String {
    let mut roles = Vec::new();
    if schedule.light_profile.as_deref() == Some(profile) {
        roles.push("light");
    }
    if schedule.dark_profile.as_deref() == Some(profile) {
        roles.push("dark");
    }
    if roles.is_empty() {
        profile.to_string()
    } else {
        format!("{profile} ({})", roles.join(", "))
    }
}

/// Display help for the list command
pub fn display_help() {
    log_version!();
    log_block_start!("list - List available profiles");
    log_block_start!("Usage: themeshift list");
    log_indented!("Profiles come from the configured backend:");
    log_indented!("gtk: installed GTK themes");
    log_indented!("command: the profiles array or the output of list_command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_marks_configured_profiles() {
        let schedule = PartialSchedule {
            light_profile: Some("Adwaita".to_string()),
            dark_profile: Some("Adwaita".to_string()),
            ..Default::default()
        };
        assert_eq!(label("Adwaita", &schedule), "Adwaita (light, dark)");
        assert_eq!(label("Other", &schedule), "Other");
    }
}
