//! Status command: the stored schedule, the period for an hour, and whether
//! a daemon is running.

use anyhow::Result;

use crate::core::period::{Period, next_change};
use crate::settings::{FileSettingsStore, PartialSchedule, Schedule};
use crate::time_source::{Clock, SystemClock};

/// Handle the status command
///
/// # Arguments
/// * `at_hour` - Hour to evaluate instead of the current local hour
pub fn handle_status_command(at_hour: Option<u8>, debug_enabled: bool) -> Result<()> {
    log_version!();

    let daemon = super::find_daemon()?;
    let store = FileSettingsStore::from_config_path()?;
    let partial = PartialSchedule::read(&store)?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Settings file: {}", crate::utils::private_path(store.path()));
    }

    match partial.complete() {
        Some(schedule) => {
            let hour = at_hour.unwrap_or_else(|| SystemClock.current_hour());
            log_schedule(&schedule, hour, at_hour.is_some());
        }
        None => {
            log_block_start!("Schedule is not configured");
            let missing: Vec<&str> = partial.missing().iter().map(|key| key.as_str()).collect();
            log_indented!("Missing: {}", missing.join(", "));
            log_indented!("Run 'themeshift configure' to finish setup");
        }
    }

    match daemon {
        Some(info) => log_block_start!("Daemon running (PID: {})", info.pid),
        None => log_block_start!("Daemon not running"),
    }
    log_end!();
    Ok(())
}

fn log_schedule(schedule: &Schedule, hour: u8, simulated: bool) {
    log_block_start!("Schedule:");
    log_indented!("Light: {} from {:02}:00", schedule.light_profile, schedule.start_hour);
    log_indented!("Dark:  {} from {:02}:00", schedule.dark_profile, schedule.end_hour);

    let period = Period::for_hour(hour, schedule.start_hour, schedule.end_hour);
    let when = if simulated { "At" } else { "Now" };
    log_block_start!(
        "{when} {hour:02}:00: {} {} ({})",
        period.symbol(),
        period.display_name(),
        period.profile(schedule)
    );
    log_indented!("{}", next_change_message(schedule, hour));
}

fn next_change_message(schedule: &Schedule, hour: u8) -> String {
    match next_change(hour, schedule.start_hour, schedule.end_hour) {
        Some(at) => {
            let next = Period::for_hour(at, schedule.start_hour, schedule.end_hour);
            format!("Switches to {} at {at:02}:00", next.profile(schedule))
        }
        None => "Never switches: the light window is empty".to_string(),
    }
}

/// Display help for the status command
pub fn display_help() {
    log_version!();
    log_block_start!("status - Show the schedule and the active period");
    log_block_start!("Usage: themeshift status [--at <hour>]");
    log_block_start!("Options:");
    log_indented!("--at <hour>            Evaluate the schedule at this hour (0-23)");
    log_block_start!("Examples:");
    log_indented!("themeshift status");
    log_indented!("themeshift status --at 21");
    log_end!();
}
