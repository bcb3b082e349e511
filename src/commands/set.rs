//! Set command implementation for modifying settings and configuration fields
//!
//! All values are validated before anything is written, and the resulting
//! file must still be a valid configuration. Comments and alignment of the
//! edited lines are preserved.

use anyhow::{Context, Result};

use super::{Field, field_toml};
use crate::config::builder::update_setting_in_content;
use crate::config::validation::validate_config;
use crate::config::{self, Config};
use crate::io::instance::send_reload_signal;
use crate::settings::FileSettingsStore;
use crate::utils::private_path;

/// Handle the set command - update fields
pub fn handle_set_command(fields: &[(String, String)]) -> Result<()> {
    log_version!();

    let daemon = super::find_daemon()?;

    // Validate all fields first before making any changes
    let mut validated = Vec::new();
    for (name, input) in fields {
        let Some(field) = Field::parse(name) else {
            log_pipe!();
            log_error!("Unknown field: '{name}'");
            super::log_available_fields();
            log_end!();
            anyhow::bail!("Unknown field '{name}'");
        };
        match field_toml(field, input) {
            Ok(value) => validated.push((field, value)),
            Err(e) => {
                log_pipe!();
                log_error!("Invalid value for field '{name}': {e}");
                log_end!();
                anyhow::bail!("Configuration validation failed");
            }
        }
    }

    let config_path = Config::get_config_path()?;
    if !config_path.exists() {
        config::create_default_config(&config_path)?;
    }
    let store = FileSettingsStore::new(&config_path);
    let content = store.read_content()?;

    let updated = match apply_fields(&content, &validated) {
        Ok(updated) => updated,
        Err(e) => {
            log_pipe!();
            log_error!("{e:#}");
            log_end!();
            return Err(e);
        }
    };

    if updated == content {
        log_block_start!("Configuration unchanged");
        log_indented!("All fields already have the specified values");
        log_end!();
        return Ok(());
    }

    store.write_atomically(&updated)?;

    log_block_start!("Updated configuration");
    for (field, value) in &validated {
        log_indented!("{} = {value}", field.name());
    }
    log_indented!("in {}", private_path(&config_path));

    match daemon {
        Some(info) => {
            send_reload_signal(info.pid)?;
            log_block_start!("Sent reload to running themeshift (PID: {})", info.pid);
        }
        None => log_block_start!("Start themeshift to apply the new settings"),
    }

    log_end!();
    Ok(())
}

/// Write every validated value into `content` and check that the result is
/// still a loadable configuration.
fn apply_fields(content: &str, fields: &[(Field, String)]) -> Result<String> {
    let updated = fields.iter().fold(content.to_string(), |content, (field, value)| {
        update_setting_in_content(&content, field.name(), value)
    });

    let config: Config =
        toml::from_str(&updated).context("The new values do not form a valid configuration")?;
    validate_config(&config).context("The new values do not form a valid configuration")?;
    Ok(updated)
}

/// Display help for the set command
pub fn display_help() {
    log_version!();
    log_block_start!("set - Update setting and configuration values");
    log_block_start!("Usage: themeshift set <field> <value> [<field> <value>...]");
    log_block_start!("Values:");
    log_indented!("light_profile, dark_profile   Profile name");
    log_indented!("start_hour, end_hour          Hour 0-23");
    log_indented!("show_notifications, first_run true or false");
    log_indented!("backend                       auto, gtk or command");
    log_indented!("check_interval                Seconds 1-3600");
    log_indented!("profiles                      Comma-separated profile names");
    super::log_available_fields();
    log_block_start!("Examples:");
    log_indented!("themeshift set start_hour 7 end_hour 19");
    log_indented!("themeshift set dark_profile \"Solarized Dark\"");
    log_indented!("themeshift set backend command apply_command \"mytool {{profile}}\"");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingKey;

    fn validated(pairs: &[(&str, &str)]) -> Vec<(Field, String)> {
        pairs
            .iter()
            .map(|(name, input)| {
                let field = Field::parse(name).unwrap();
                (field, field_toml(field, input).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_apply_fields_updates_and_appends() {
        let content = "backend = \"auto\"   # Which backend\nstart_hour = 8\n";
        let updated = apply_fields(
            content,
            &validated(&[("start_hour", "7"), ("end_hour", "19"), ("backend", "gtk")]),
        )
        .unwrap();

        assert!(updated.contains("backend = \"gtk\"   # Which backend"));
        assert!(updated.contains("start_hour = 7"));
        assert!(updated.contains("end_hour = 19"));
    }

    #[test]
    fn test_apply_fields_rejects_invalid_result() {
        // A command backend without apply_command is not a valid configuration
        let result = apply_fields("", &validated(&[("backend", "command")]));
        assert!(result.is_err());

        let result = apply_fields(
            "",
            &validated(&[
                ("backend", "command"),
                ("apply_command", "tool {profile}"),
                ("profiles", "Light,Dark"),
            ]),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_profile_names_are_quoted() {
        let updated = apply_fields("", &validated(&[("dark_profile", "Say \"hi\" # now")])).unwrap();
        let table: toml::Table = toml::from_str(&updated).unwrap();
        assert_eq!(
            table[SettingKey::DarkProfile.as_str()].as_str(),
            Some("Say \"hi\" # now")
        );
    }
}
