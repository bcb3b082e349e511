//! Command-line command handlers for themeshift.
//!
//! Each one-shot command lives in its own submodule. The helpers here map
//! field names used by `get` and `set` onto either a schedule setting or a
//! host configuration key in `themeshift.toml`.

pub mod configure;
pub mod get;
pub mod help;
pub mod list;
pub mod set;
pub mod status;
pub mod switch;

use anyhow::Result;
use serde_json::json;

use crate::config::Config;
use crate::constants::*;
use crate::io::instance::{InstanceInfo, adopt_config_dir, get_running_instance};
use crate::settings::{SettingKey, SettingValue, SettingsStore};

/// Host configuration keys readable with `get` and writable with `set`.
pub const CONFIG_FIELDS: [&str; 8] = [
    "backend",
    "force_refresh",
    "check_interval",
    "desktop_notifications",
    "profiles",
    "list_command",
    "apply_command",
    "refresh_command",
];

/// A field name resolved to what it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Setting(SettingKey),
    Config(&'static str),
}

impl Field {
    pub fn parse(name: &str) -> Option<Field> {
        SettingKey::from_name(name)
            .map(Field::Setting)
            .or_else(|| {
                CONFIG_FIELDS
                    .into_iter()
                    .find(|field| *field == name)
                    .map(Field::Config)
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Setting(key) => key.as_str(),
            Field::Config(name) => *name,
        }
    }
}

/// Every field name, settings first.
pub fn all_field_names() -> Vec<&'static str> {
    SettingKey::ALL
        .iter()
        .map(|key| key.as_str())
        .chain(CONFIG_FIELDS)
        .collect()
}

/// Current value of `field` as JSON. Absent values are `null`.
pub fn field_value(field: Field, config: &Config, store: &dyn SettingsStore) -> Result<serde_json::Value> {
    let value = match field {
        Field::Setting(SettingKey::ShowNotifications) => json!(store.show_notifications()?),
        Field::Setting(SettingKey::FirstRun) => json!(store.first_run()?),
        Field::Setting(key) => store
            .get(key)?
            .map(|value| value.to_json())
            .unwrap_or(serde_json::Value::Null),
        Field::Config(name) => match name {
            "backend" => json!(config.backend.unwrap_or(DEFAULT_BACKEND).as_str()),
            "force_refresh" => json!(config.force_refresh()),
            "check_interval" => json!(config.check_interval().as_secs()),
            "desktop_notifications" => json!(config.desktop_notifications()),
            "profiles" => json!(config.profiles),
            "list_command" => json!(config.list_command),
            "apply_command" => json!(config.apply_command),
            "refresh_command" => json!(config.refresh_command),
            other => anyhow::bail!("Unknown field: {other}"),
        },
    };
    Ok(value)
}

/// Parse user input for `field` into the TOML text written to the file.
pub fn field_toml(field: Field, input: &str) -> Result<String> {
    let value = match field {
        Field::Setting(key) => SettingValue::parse_for(key, input)?.to_toml(),
        Field::Config(name) => match name {
            "backend" => match input.trim() {
                value @ ("auto" | "gtk" | "command") => toml::Value::from(value).to_string(),
                other => anyhow::bail!("backend must be auto, gtk or command (got '{other}')"),
            },
            "force_refresh" | "desktop_notifications" => {
                let flag = SettingValue::parse_for(SettingKey::ShowNotifications, input)
                    .map_err(|_| anyhow::anyhow!("{name} must be true or false (got '{input}')"))?;
                flag.to_toml()
            }
            "check_interval" => {
                let seconds = crate::prompt::parse_bounded_integer(
                    input,
                    MINIMUM_CHECK_INTERVAL as i64,
                    MAXIMUM_CHECK_INTERVAL as i64,
                )
                .map_err(|e| anyhow::anyhow!("check_interval: {e}"))?;
                seconds.to_string()
            }
            "profiles" => {
                let entries: Vec<toml::Value> = input
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(toml::Value::from)
                    .collect();
                if entries.is_empty() {
                    anyhow::bail!("profiles needs at least one comma-separated name");
                }
                toml::Value::Array(entries).to_string()
            }
            "list_command" | "apply_command" | "refresh_command" => {
                toml::Value::from(input).to_string()
            }
            other => anyhow::bail!("Unknown field: {other}"),
        },
    };
    Ok(value)
}

/// Show the available fields after an unknown-field error.
pub(crate) fn log_available_fields() {
    log_block_start!("Available fields:");
    log_indented!("all (get only: every field)");
    for key in SettingKey::ALL {
        log_indented!("{:<20}{}", key.as_str(), key.description());
    }
    log_indented!("{}", CONFIG_FIELDS.join(", "));
}

/// Find a running daemon and, unless `--config` was given, use its
/// configuration directory.
pub(crate) fn find_daemon() -> Result<Option<InstanceInfo>> {
    let instance = get_running_instance()?;
    if let Some(ref info) = instance {
        adopt_config_dir(info);
    }
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettingsStore;

    #[test]
    fn test_field_names_resolve() {
        for name in all_field_names() {
            assert_eq!(Field::parse(name).map(|field| field.name()), Some(name));
        }
        assert_eq!(Field::parse("night_temp"), None);
    }

    #[test]
    fn test_field_values_apply_defaults() {
        let config = Config::default();
        let store = MemorySettingsStore::new();

        let get = |name| field_value(Field::parse(name).unwrap(), &config, &store).unwrap();
        assert_eq!(get("backend"), json!("auto"));
        assert_eq!(get("check_interval"), json!(DEFAULT_CHECK_INTERVAL));
        assert_eq!(get("show_notifications"), json!(true));
        assert_eq!(get("first_run"), json!(true));
        assert_eq!(get("light_profile"), serde_json::Value::Null);
        assert_eq!(get("apply_command"), serde_json::Value::Null);
    }

    #[test]
    fn test_field_toml_validates_input() {
        let toml_for = |name, input| field_toml(Field::parse(name).unwrap(), input);

        assert_eq!(toml_for("start_hour", "7").unwrap(), "7");
        assert!(toml_for("start_hour", "24").is_err());
        let backend: toml::Table =
            toml::from_str(&format!("b = {}", toml_for("backend", "gtk").unwrap())).unwrap();
        assert_eq!(backend["b"].as_str(), Some("gtk"));
        assert!(toml_for("backend", "wayland").is_err());
        assert_eq!(toml_for("force_refresh", "on").unwrap(), "true");
        assert!(toml_for("check_interval", "0").is_err());
        assert_eq!(toml_for("check_interval", "300").unwrap(), "300");
        assert!(toml_for("profiles", " , ").is_err());

        let profiles: toml::Table =
            toml::from_str(&format!("p = {}", toml_for("profiles", "Light, Dark").unwrap()))
                .unwrap();
        assert_eq!(
            profiles["p"],
            toml::Value::Array(vec!["Light".into(), "Dark".into()])
        );
    }
}
