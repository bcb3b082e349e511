//! Persistent user settings: the two profiles, the hour window and two flags.
//!
//! Settings are accessed one key at a time through the [`SettingsStore`]
//! trait so the setup flow can save each answer the moment it is given. Two
//! stores are provided:
//!
//! - [`FileSettingsStore`]: keys inside `themeshift.toml`, edited in place
//! - [`MemorySettingsStore`]: in-memory, for tests and embedding
//!
//! Values read back from a store are normalized: an empty profile name and an
//! hour outside `0..=23` are reported as absent.

use anyhow::Result;
use std::fmt;

use crate::constants::{DEFAULT_SHOW_NOTIFICATIONS, MAXIMUM_HOUR, MINIMUM_HOUR};

pub mod file;
pub mod memory;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

/// The type a setting holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Text,
    Hour,
    Flag,
}

/// Every setting themeshift persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    LightProfile,
    DarkProfile,
    StartHour,
    EndHour,
    ShowNotifications,
    FirstRun,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::LightProfile,
        SettingKey::DarkProfile,
        SettingKey::StartHour,
        SettingKey::EndHour,
        SettingKey::ShowNotifications,
        SettingKey::FirstRun,
    ];

    /// The four keys that make up a schedule.
    pub const SCHEDULE: [SettingKey; 4] = [
        SettingKey::LightProfile,
        SettingKey::DarkProfile,
        SettingKey::StartHour,
        SettingKey::EndHour,
    ];

    /// Key name as written in the settings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::LightProfile => "light_profile",
            SettingKey::DarkProfile => "dark_profile",
            SettingKey::StartHour => "start_hour",
            SettingKey::EndHour => "end_hour",
            SettingKey::ShowNotifications => "show_notifications",
            SettingKey::FirstRun => "first_run",
        }
    }

    pub fn from_name(name: &str) -> Option<SettingKey> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub fn kind(&self) -> SettingKind {
        match self {
            SettingKey::LightProfile | SettingKey::DarkProfile => SettingKind::Text,
            SettingKey::StartHour | SettingKey::EndHour => SettingKind::Hour,
            SettingKey::ShowNotifications | SettingKey::FirstRun => SettingKind::Flag,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SettingKey::LightProfile => "Profile applied inside the hour window",
            SettingKey::DarkProfile => "Profile applied outside the hour window",
            SettingKey::StartHour => "First hour of the light window (0-23)",
            SettingKey::EndHour => "First hour after the light window (0-23)",
            SettingKey::ShowNotifications => "Notify after each successful switch",
            SettingKey::FirstRun => "Show the welcome message on next start",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Hour(u8),
    Flag(bool),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Text(_) => SettingKind::Text,
            SettingValue::Hour(_) => SettingKind::Hour,
            SettingValue::Flag(_) => SettingKind::Flag,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_hour(&self) -> Option<u8> {
        match self {
            SettingValue::Hour(hour) => Some(*hour),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// TOML literal for this value, quoted and escaped for text.
    pub fn to_toml(&self) -> String {
        match self {
            SettingValue::Text(text) => toml::Value::String(text.clone()).to_string(),
            SettingValue::Hour(hour) => hour.to_string(),
            SettingValue::Flag(flag) => flag.to_string(),
        }
    }

    /// JSON form used by `get --json`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SettingValue::Text(text) => serde_json::Value::from(text.as_str()),
            SettingValue::Hour(hour) => serde_json::Value::from(*hour),
            SettingValue::Flag(flag) => serde_json::Value::from(*flag),
        }
    }

    /// Parse a command-line value for `key`.
    pub fn parse_for(key: SettingKey, input: &str) -> Result<SettingValue> {
        let value = match key.kind() {
            SettingKind::Text => SettingValue::Text(input.to_string()),
            SettingKind::Hour => {
                let hour = crate::prompt::parse_bounded_integer(
                    input,
                    i64::from(MINIMUM_HOUR),
                    i64::from(MAXIMUM_HOUR),
                )
                .map_err(|e| anyhow::anyhow!("{key}: {e}"))?;
                SettingValue::Hour(hour as u8)
            }
            SettingKind::Flag => match input.trim() {
                "true" | "on" | "yes" => SettingValue::Flag(true),
                "false" | "off" | "no" => SettingValue::Flag(false),
                other => anyhow::bail!("{key} must be true or false (got '{other}')"),
            },
        };
        Ok(value)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => f.write_str(text),
            SettingValue::Hour(hour) => write!(f, "{hour}"),
            SettingValue::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// Check that `value` may be stored under `key`.
pub(crate) fn check_value(key: SettingKey, value: &SettingValue) -> Result<()> {
    if value.kind() != key.kind() {
        anyhow::bail!("{key} expects a {:?} value, got {:?}", key.kind(), value);
    }
    if let SettingValue::Hour(hour) = value
        && !(MINIMUM_HOUR..=MAXIMUM_HOUR).contains(hour)
    {
        anyhow::bail!(
            "{key} ({hour}) must be between {MINIMUM_HOUR} and {MAXIMUM_HOUR}"
        );
    }
    Ok(())
}

/// Apply read-side normalization to a stored value.
pub(crate) fn normalize(key: SettingKey, value: SettingValue) -> Option<SettingValue> {
    match value {
        SettingValue::Text(ref text) if text.trim().is_empty() => None,
        SettingValue::Hour(hour) if hour > MAXIMUM_HOUR => {
            log_warning!("Ignoring {key} = {hour}: must be between {MINIMUM_HOUR} and {MAXIMUM_HOUR}");
            None
        }
        other if other.kind() != key.kind() => None,
        other => Some(other),
    }
}

/// Key/value persistence for settings.
pub trait SettingsStore {
    /// Read a setting. Absent, empty or invalid values are `None`.
    fn get(&self, key: SettingKey) -> Result<Option<SettingValue>>;

    /// Persist a setting.
    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<()>;

    /// Read a flag, falling back to `default` when absent.
    fn flag(&self, key: SettingKey, default: bool) -> Result<bool> {
        Ok(self
            .get(key)?
            .and_then(|value| value.as_flag())
            .unwrap_or(default))
    }

    fn show_notifications(&self) -> Result<bool> {
        self.flag(SettingKey::ShowNotifications, DEFAULT_SHOW_NOTIFICATIONS)
    }

    fn first_run(&self) -> Result<bool> {
        self.flag(SettingKey::FirstRun, true)
    }
}

/// A fully configured schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub light_profile: String,
    pub dark_profile: String,
    pub start_hour: u8,
    pub end_hour: u8,
}

/// The schedule fields as currently stored, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSchedule {
    pub light_profile: Option<String>,
    pub dark_profile: Option<String>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
}

impl PartialSchedule {
    pub fn read(store: &dyn SettingsStore) -> Result<Self> {
        let text = |key| -> Result<Option<String>> {
            Ok(store
                .get(key)?
                .and_then(|value| value.as_text().map(str::to_string)))
        };
        let hour = |key| -> Result<Option<u8>> {
            Ok(store.get(key)?.and_then(|value| value.as_hour()))
        };

        Ok(Self {
            light_profile: text(SettingKey::LightProfile)?,
            dark_profile: text(SettingKey::DarkProfile)?,
            start_hour: hour(SettingKey::StartHour)?,
            end_hour: hour(SettingKey::EndHour)?,
        })
    }

    /// The schedule, if all four fields are present.
    pub fn complete(&self) -> Option<Schedule> {
        Some(Schedule {
            light_profile: self.light_profile.clone()?,
            dark_profile: self.dark_profile.clone()?,
            start_hour: self.start_hour?,
            end_hour: self.end_hour?,
        })
    }

    pub fn missing(&self) -> Vec<SettingKey> {
        let mut missing = Vec::new();
        if self.light_profile.is_none() {
            missing.push(SettingKey::LightProfile);
        }
        if self.dark_profile.is_none() {
            missing.push(SettingKey::DarkProfile);
        }
        if self.start_hour.is_none() {
            missing.push(SettingKey::StartHour);
        }
        if self.end_hour.is_none() {
            missing.push(SettingKey::EndHour);
        }
        missing
    }
}
