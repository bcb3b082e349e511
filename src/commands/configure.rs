//! Configure command: prompt for every schedule setting.

use anyhow::{Context, Result};

use crate::backend::backend_from_config;
use crate::config::Config;
use crate::io::instance::send_reload_signal;
use crate::prompt::TerminalPrompter;
use crate::themeshift::create_core;

/// Handle the configure command
pub fn handle_configure_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let daemon = super::find_daemon()?;
    let config = Config::load().context("Failed to load configuration")?;
    let backend = backend_from_config(&config, debug_enabled)?;
    let mut core = create_core(&config, backend, TerminalPrompter::new(), debug_enabled)?;

    let saved = core.configure()?;

    if saved > 0
        && let Some(info) = daemon
    {
        send_reload_signal(info.pid)?;
        log_block_start!("Sent reload to running themeshift (PID: {})", info.pid);
    }

    let schedule = core.read_schedule()?;
    if schedule.complete().is_none() {
        let missing: Vec<&str> = schedule.missing().iter().map(|key| key.as_str()).collect();
        log_pipe!();
        log_warning!("Still missing: {}", missing.join(", "));
    }

    log_end!();
    Ok(())
}

/// Display help for the configure command
pub fn display_help() {
    log_version!();
    log_block_start!("configure - Choose profiles and hours interactively");
    log_block_start!("Usage: themeshift configure");
    log_indented!("Alias: c");
    log_block_start!("Prompts, in order:");
    log_indented!("1. Light profile (picked from the backend's profiles)");
    log_indented!("2. Dark profile");
    log_indented!("3. Hour the light profile starts (0-23)");
    log_indented!("4. Hour the dark profile starts (0-23)");
    log_indented!("Skipping a prompt keeps the current value");
    log_end!();
}
