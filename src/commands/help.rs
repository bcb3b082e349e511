//! Help command implementation for themeshift.
//!
//! This module provides a dispatcher for the help command that shows
//! command-specific help or general help based on the arguments provided.

use anyhow::Result;

use crate::args::canonical_command;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command.map(|name| (name, canonical_command(name))) {
        None => display_general_help(),
        Some((_, Some("configure"))) => super::configure::display_help(),
        Some((_, Some("get"))) => super::get::display_help(),
        Some((_, Some("help"))) => display_help_help(),
        Some((_, Some("list"))) => super::list::display_help(),
        Some((_, Some("set"))) => super::set::display_help(),
        Some((_, Some("status"))) => super::status::display_help(),
        Some((_, Some("switch"))) => super::switch::display_help(),
        Some((unknown, _)) => {
            log_warning!("Unknown command: {unknown}");
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("configure, c           Choose profiles and hours interactively");
    log_indented!("get <field>...         Read setting values");
    log_indented!("help [COMMAND]         Show detailed help for a command");
    log_indented!("list, l                List available profiles");
    log_indented!("set <field> <value>... Update setting values");
    log_indented!("status                 Show the schedule and active period");
    log_indented!("switch, s              Check the schedule and switch now");
    log_pipe!();
    log_info!("Use 'themeshift help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'themeshift --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: themeshift help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("themeshift help");
    log_indented!("themeshift help set");
    log_end!();
}
