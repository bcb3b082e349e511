//! Command backend: user-provided shell commands.
//!
//! ```toml
//! backend = "command"
//! apply_command = "my-theme-tool set {profile}"
//! list_command = "my-theme-tool list"     # or: profiles = ["Light", "Dark"]
//! refresh_command = "my-theme-tool reload"
//! ```
//!
//! Commands run through `sh -c`. `{profile}` is replaced by `"$1"` and the
//! profile is passed as the first positional argument, so profile names are
//! never interpreted by the shell.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

use super::ProfileBackend;
use crate::config::Config;

/// Runs configured shell commands to list and apply profiles.
#[derive(Debug)]
pub struct CommandBackend {
    profiles: Option<Vec<String>>,
    list_command: Option<String>,
    apply_command: String,
    refresh_command: Option<String>,
    debug_enabled: bool,
}

impl CommandBackend {
    pub fn new(config: &Config, debug_enabled: bool) -> Result<Self> {
        let apply_command = config
            .apply_command
            .clone()
            .filter(|command| !command.trim().is_empty())
            .context("The command backend requires apply_command to be set")?;

        Ok(Self {
            profiles: config.profiles.clone(),
            list_command: config.list_command.clone(),
            apply_command,
            refresh_command: config.refresh_command.clone(),
            debug_enabled,
        })
    }
}

/// Turn a command template into a script that reads the profile from `$1`.
fn shell_script(template: &str) -> String {
    template.replace("{profile}", "\"$1\"")
}

/// Run `template` through `sh -c`, binding `profile` to `$1`.
///
/// Returns stdout. A non-zero exit status is an error carrying stderr.
fn run_shell(template: &str, profile: Option<&str>, debug_enabled: bool) -> Result<String> {
    let script = shell_script(template);
    if debug_enabled {
        log_debug!("Running: sh -c '{script}'");
    }

    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(&script)
        .arg("themeshift")
        .stdin(Stdio::null());
    if let Some(profile) = profile {
        command.arg(profile);
    }

    let output = command
        .output()
        .with_context(|| format!("Failed to run '{template}'"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        if detail.is_empty() {
            anyhow::bail!("'{template}' exited with {}", output.status);
        }
        anyhow::bail!("'{template}' exited with {}: {detail}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl ProfileBackend for CommandBackend {
    fn list_profiles(&self) -> Result<Vec<String>> {
        if let Some(ref profiles) = self.profiles {
            return Ok(profiles.clone());
        }
        let Some(ref list_command) = self.list_command else {
            return Ok(Vec::new());
        };

        let output = run_shell(list_command, None, self.debug_enabled)?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn apply_profile(&mut self, profile: &str) -> Result<()> {
        run_shell(&self.apply_command, Some(profile), self.debug_enabled)?;
        Ok(())
    }

    fn force_refresh(&mut self, profile: &str) -> Result<()> {
        if let Some(ref refresh_command) = self.refresh_command {
            run_shell(refresh_command, Some(profile), self.debug_enabled)?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Command"
    }
}
