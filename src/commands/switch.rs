//! Switch command: check the schedule now.
//!
//! With a daemon running the check happens there (SIGUSR2), so its
//! last-applied state stays authoritative. Otherwise one cycle runs in this
//! process.

use anyhow::{Context, Result};

use crate::backend::backend_from_config;
use crate::config::Config;
use crate::io::instance::send_check_signal;
use crate::prompt::TerminalPrompter;
use crate::themeshift::{create_core, report_cycle};

/// Handle the switch command
pub fn handle_switch_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    if let Some(info) = super::find_daemon()? {
        send_check_signal(info.pid)?;
        log_block_start!("Asked running themeshift to check now (PID: {})", info.pid);
        log_end!();
        return Ok(());
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("No running daemon, checking in this process");
    }

    let config = Config::load().context("Failed to load configuration")?;
    let backend = backend_from_config(&config, debug_enabled)?;
    let mut core = create_core(&config, backend, TerminalPrompter::new(), debug_enabled)?;
    // Always show the outcome of a one-shot check
    report_cycle(core.run_cycle(), true);
    log_end!();
    Ok(())
}

/// Display help for the switch command
pub fn display_help() {
    log_version!();
    log_block_start!("switch - Check the schedule and switch now");
    log_block_start!("Usage: themeshift switch");
    log_indented!("Alias: s");
    log_indented!("Signals a running daemon, or checks once when none is running");
    log_end!();
}
