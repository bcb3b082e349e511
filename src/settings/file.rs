//! Settings stored as top-level keys of `themeshift.toml`.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{SettingKey, SettingKind, SettingValue, SettingsStore, check_value, normalize};
use crate::config::builder::update_setting_in_content;
use crate::utils::private_path;

/// File-backed settings.
///
/// Every `get` re-reads the file so edits made by another process or by
/// hand are seen immediately. `set` rewrites only the affected line.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the active configuration file.
    pub fn from_config_path() -> Result<Self> {
        Ok(Self::new(crate::config::get_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", private_path(&self.path)))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", private_path(&self.path)))
    }

    /// Raw file content; empty when the file does not exist yet.
    pub(crate) fn read_content(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", private_path(&self.path)))
    }

    /// Replace the file through a temporary file and an atomic rename.
    pub(crate) fn write_atomically(&self, content: &str) -> Result<()> {
        let parent = self
            .path
            .parent()
            .context("Settings file has no parent directory")?;
        fs::create_dir_all(parent).context("Failed to create settings directory")?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .context("Failed to create temporary settings file")?;
        temp.write_all(content.as_bytes())
            .context("Failed to write temporary settings file")?;
        temp.as_file()
            .sync_all()
            .context("Failed to flush temporary settings file")?;
        temp.persist(&self.path).with_context(|| {
            format!("Failed to replace settings file {}", private_path(&self.path))
        })?;
        Ok(())
    }
}

/// Convert a raw TOML value into a setting value for `key`.
fn from_toml(key: SettingKey, raw: &toml::Value) -> Option<SettingValue> {
    let value = match (key.kind(), raw) {
        (SettingKind::Text, toml::Value::String(text)) => SettingValue::Text(text.clone()),
        (SettingKind::Hour, toml::Value::Integer(hour)) => match u8::try_from(*hour) {
            Ok(hour) => SettingValue::Hour(hour),
            Err(_) => {
                log_warning!("Ignoring {key} = {hour}: must be between 0 and 23");
                return None;
            }
        },
        (SettingKind::Flag, toml::Value::Boolean(flag)) => SettingValue::Flag(*flag),
        (kind, other) => {
            log_warning!(
                "Ignoring {key} = {other}: expected a {} value",
                format!("{kind:?}").to_lowercase()
            );
            return None;
        }
    };
    normalize(key, value)
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: SettingKey) -> Result<Option<SettingValue>> {
        let table = self.read_table()?;
        Ok(table.get(key.as_str()).and_then(|raw| from_toml(key, raw)))
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<()> {
        check_value(key, &value)?;

        let content = self.read_content()?;
        let updated = update_setting_in_content(&content, key.as_str(), &value.to_toml());
        self.write_atomically(&updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::create_default_config;
    use crate::constants::test_constants::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> FileSettingsStore {
        FileSettingsStore::new(dir.join("themeshift.toml"))
    }

    #[test]
    fn test_missing_file_reads_as_absent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        for key in SettingKey::ALL {
            assert_eq!(store.get(key).unwrap(), None);
        }
    }

    #[test]
    fn test_round_trip_every_key() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        let values = [
            (SettingKey::LightProfile, SettingValue::Text(TEST_LIGHT_PROFILE.into())),
            (SettingKey::DarkProfile, SettingValue::Text(TEST_DARK_PROFILE.into())),
            (SettingKey::StartHour, SettingValue::Hour(0)),
            (SettingKey::EndHour, SettingValue::Hour(23)),
            (SettingKey::ShowNotifications, SettingValue::Flag(false)),
            (SettingKey::FirstRun, SettingValue::Flag(false)),
        ];
        for (key, value) in &values {
            store.set(*key, value.clone()).unwrap();
        }
        for (key, value) in &values {
            assert_eq!(store.get(*key).unwrap().as_ref(), Some(value));
        }
    }

    #[test]
    fn test_set_preserves_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("themeshift.toml");
        create_default_config(&path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let mut store = FileSettingsStore::new(&path);
        store
            .set(SettingKey::ShowNotifications, SettingValue::Flag(false))
            .unwrap();
        store.set(SettingKey::StartHour, SettingValue::Hour(8)).unwrap();

        let after = fs::read_to_string(&path).unwrap();
        for line in before.lines().filter(|l| !l.starts_with("show_notifications")) {
            assert!(after.lines().any(|l| l == line), "lost line: {line}");
        }
        let flag_line = after
            .lines()
            .find(|l| l.starts_with("show_notifications"))
            .unwrap();
        assert!(flag_line.starts_with("show_notifications = false"));
        assert!(flag_line.ends_with("# Notify after each successful switch"));
        assert!(after.ends_with("start_hour = 8\n"));

        // Host configuration still loads after settings edits
        assert!(crate::config::load_from_path(&path).is_ok());
    }

    #[test]
    fn test_set_replaces_instead_of_duplicating() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.set(SettingKey::EndHour, SettingValue::Hour(18)).unwrap();
        store.set(SettingKey::EndHour, SettingValue::Hour(19)).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.matches("end_hour").count(), 1);
        assert_eq!(store.get(SettingKey::EndHour).unwrap(), Some(SettingValue::Hour(19)));
    }

    #[test]
    fn test_invalid_persisted_values_read_as_absent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.path(),
            "light_profile = \"\"\nstart_hour = 24\nend_hour = \"18\"\ndark_profile = 3\n",
        )
        .unwrap();

        assert_eq!(store.get(SettingKey::LightProfile).unwrap(), None);
        assert_eq!(store.get(SettingKey::StartHour).unwrap(), None);
        assert_eq!(store.get(SettingKey::EndHour).unwrap(), None);
        assert_eq!(store.get(SettingKey::DarkProfile).unwrap(), None);
    }

    #[test]
    fn test_external_edits_are_seen() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.set(SettingKey::StartHour, SettingValue::Hour(7)).unwrap();
        fs::write(store.path(), "start_hour = 10\n").unwrap();
        assert_eq!(store.get(SettingKey::StartHour).unwrap(), Some(SettingValue::Hour(10)));
    }

    #[test]
    fn test_set_rejects_out_of_range_hour() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(store.set(SettingKey::StartHour, SettingValue::Hour(24)).is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_flags_default_when_absent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.show_notifications().unwrap());
        assert!(store.first_run().unwrap());
    }
}
