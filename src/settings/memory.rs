//! In-memory settings.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{SettingKey, SettingValue, SettingsStore, check_value, normalize};

/// Settings held in memory.
///
/// Clones share the same values, so a test can hand one clone to the
/// decision core and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: Arc<Mutex<HashMap<SettingKey, SettingValue>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for seeding values.
    pub fn with(self, key: SettingKey, value: SettingValue) -> Result<Self> {
        check_value(key, &value)?;
        self.lock().insert(key, value);
        Ok(self)
    }

    /// Remove a value, leaving the key absent.
    pub fn clear(&self, key: SettingKey) {
        self.lock().remove(&key);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SettingKey, SettingValue>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: SettingKey) -> Result<Option<SettingValue>> {
        Ok(self
            .lock()
            .get(&key)
            .cloned()
            .and_then(|value| normalize(key, value)))
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<()> {
        check_value(key, &value)?;
        self.lock().insert(key, value);
        Ok(())
    }
}
