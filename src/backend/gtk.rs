//! GTK backend: installed GTK themes switched through `gsettings`.
//!
//! A theme is any directory containing `gtk-3.0` or `gtk-4.0` under one of
//! the theme search paths:
//!
//! - `~/.themes`
//! - `$XDG_DATA_HOME/themes`
//! - `<dir>/themes` for each entry of `$XDG_DATA_DIRS`

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::ProfileBackend;
use crate::constants::*;
use crate::utils::find_in_path;

/// Directories searched for GTK themes, in priority order.
pub fn theme_search_dirs() -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();
    if let Some(home) = dirs::home_dir() {
        dirs_list.push(home.join(".themes"));
    }
    if let Some(data_dir) = dirs::data_dir() {
        dirs_list.push(data_dir.join("themes"));
    }
    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_XDG_DATA_DIRS.to_string());
    for dir in data_dirs.split(':').filter(|dir| !dir.is_empty()) {
        dirs_list.push(Path::new(dir).join("themes"));
    }
    dirs_list
}

fn is_gtk_theme(path: &Path) -> bool {
    path.join("gtk-3.0").is_dir() || path.join("gtk-4.0").is_dir()
}

/// Collect theme names from `search_dirs`, sorted and de-duplicated.
/// Missing or unreadable directories are skipped.
pub fn scan_themes(search_dirs: &[PathBuf]) -> Vec<String> {
    let mut themes = BTreeSet::new();
    for dir in search_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if is_gtk_theme(&path)
                && let Some(name) = path.file_name().and_then(|name| name.to_str())
            {
                themes.insert(name.to_string());
            }
        }
    }
    themes.into_iter().collect()
}

/// Switches `org.gnome.desktop.interface gtk-theme`.
#[derive(Debug)]
pub struct GtkBackend {
    gsettings: PathBuf,
    search_dirs: Vec<PathBuf>,
    debug_enabled: bool,
}

impl GtkBackend {
    pub fn new(debug_enabled: bool) -> Result<Self> {
        let gsettings = find_in_path(GSETTINGS_BINARY)
            .with_context(|| format!("The GTK backend requires '{GSETTINGS_BINARY}' on PATH"))?;
        Ok(Self {
            gsettings,
            search_dirs: theme_search_dirs(),
            debug_enabled,
        })
    }

    /// Backend with explicit theme directories and `gsettings` binary.
    pub fn with_paths(gsettings: PathBuf, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            gsettings,
            search_dirs,
            debug_enabled: false,
        }
    }

    fn set_theme(&self, theme: &str) -> Result<()> {
        if self.debug_enabled {
            log_debug!("{GSETTINGS_BINARY} set {GTK_INTERFACE_SCHEMA} {GTK_THEME_KEY} {theme}");
        }

        let output = Command::new(&self.gsettings)
            .args(["set", GTK_INTERFACE_SCHEMA, GTK_THEME_KEY, theme])
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {GSETTINGS_BINARY}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{GSETTINGS_BINARY} exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

impl ProfileBackend for GtkBackend {
    fn list_profiles(&self) -> Result<Vec<String>> {
        Ok(scan_themes(&self.search_dirs))
    }

    fn apply_profile(&mut self, profile: &str) -> Result<()> {
        self.set_theme(profile)
    }

    /// GTK applications only re-read the theme when the key value changes,
    /// so switch to some other installed theme first.
    fn force_refresh(&mut self, profile: &str) -> Result<()> {
        let other = self
            .list_profiles()?
            .into_iter()
            .find(|theme| theme != profile);
        match other {
            Some(theme) => self.set_theme(&theme),
            None => Ok(()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "GTK"
    }
}
