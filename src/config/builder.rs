//! Configuration file building and in-place editing.
//!
//! Creates the commented default configuration and rewrites single keys in
//! an existing file without disturbing the rest of it. Schedule settings are
//! appended under the trailing `#[Schedule]` section when they are first
//! written.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::utils::private_path;

/// Create the default configuration file.
///
/// Schedule keys are left out; the first activation asks for them.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let config_content = ConfigBuilder::new()
        .add_section("Backend")
        .add_setting(
            "backend",
            &format!("\"{}\"", DEFAULT_BACKEND.as_str()),
            "Backend to use: \"auto\", \"gtk\" or \"command\"",
        )
        .add_setting(
            "force_refresh",
            &DEFAULT_FORCE_REFRESH.to_string(),
            "Apply another profile first so the host reloads the target",
        )
        .add_setting(
            "check_interval",
            &DEFAULT_CHECK_INTERVAL.to_string(),
            &format!(
                "Seconds between scheduled checks ({MINIMUM_CHECK_INTERVAL}-{MAXIMUM_CHECK_INTERVAL})"
            ),
        )
        .add_section("Command backend")
        .add_comment("apply_command = \"my-theme-tool set {profile}\"")
        .add_comment("list_command = \"my-theme-tool list\"")
        .add_comment("refresh_command = \"my-theme-tool reload\"")
        .add_comment("profiles = [\"Light\", \"Dark\"]")
        .add_section("Notifications")
        .add_setting(
            "desktop_notifications",
            &DEFAULT_DESKTOP_NOTIFICATIONS.to_string(),
            "Send notifications through notify-send",
        )
        .add_setting(
            "show_notifications",
            &DEFAULT_SHOW_NOTIFICATIONS.to_string(),
            "Notify after each successful switch",
        )
        .add_section("Schedule")
        .add_comment("Written by 'themeshift configure' or 'themeshift set'")
        .build();

    fs::write(path, config_content).with_context(|| {
        format!(
            "Failed to write default config file to {}",
            private_path(path)
        )
    })?;
    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments on setting lines are padded to a shared column computed from the
/// widest `key = value` line.
struct ConfigBuilder {
    entries: Vec<Entry>,
}

enum Entry {
    Section(String),
    Comment(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(Entry::Section(format!("#[{title}]")));
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(Entry::Comment(format!("# {text}")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                Entry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                Entry::Comment(text) => result.push(text),
                Entry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}

/// Find the active (uncommented) line assigning `key`.
pub(crate) fn find_config_line(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .find(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with('#')
                && trimmed
                    .split_once('=')
                    .is_some_and(|(name, _)| name.trim() == key)
        })
        .map(str::to_string)
}

/// Byte offset of a trailing `#` comment, ignoring `#` inside quoted values.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return Some(i),
            None => {}
        }
    }
    None
}

/// Preserve the original comment formatting when updating a config line value.
///
/// The whitespace between the old value and its comment is kept as-is.
pub(crate) fn preserve_comment_formatting(
    original_line: &str,
    key: &str,
    new_value: &str,
) -> String {
    let indent_len = original_line.len() - original_line.trim_start().len();
    let key_value_part = format!("{}{key} = {new_value}", &original_line[..indent_len]);

    if let Some(comment_pos) = comment_start(original_line) {
        let comment_part = &original_line[comment_pos..];
        let before_comment = &original_line[..comment_pos];
        let original_spacing =
            match before_comment.rfind(|c: char| !c.is_whitespace()) {
                Some(last_non_space) => &before_comment[last_non_space + 1..],
                None => " ",
            };
        let spacing = if original_spacing.is_empty() {
            " "
        } else {
            original_spacing
        };

        format!("{key_value_part}{spacing}{comment_part}")
    } else {
        key_value_part
    }
}

/// Set `key` to an already TOML-encoded `value`.
///
/// The existing line is rewritten in place when present; otherwise the key
/// is appended at the end of the file.
pub(crate) fn update_setting_in_content(content: &str, key: &str, value: &str) -> String {
    if let Some(existing) = find_config_line(content, key) {
        let replacement = preserve_comment_formatting(&existing, key, value);
        let mut replaced = false;
        let mut lines: Vec<&str> = Vec::new();
        for line in content.lines() {
            if !replaced && line == existing {
                lines.push(&replacement);
                replaced = true;
            } else {
                lines.push(line);
            }
        }
        let mut updated = lines.join("\n");
        if content.ends_with('\n') {
            updated.push('\n');
        }
        updated
    } else {
        let mut updated = content.to_string();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&format!("{key} = {value}\n"));
        updated
    }
}
