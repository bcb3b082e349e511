//! Main application entry point.
//!
//! Parses the command line and dispatches to the daemon runner or to one of
//! the one-shot commands. Everything else lives in the library crate.

use anyhow::Result;

use themeshift::Themeshift;
use themeshift::args::{self, CliAction, ParsedArgs};
use themeshift::commands;
use themeshift::config;
use themeshift::constants::EXIT_FAILURE;

/// Use `--config <dir>` if given. Without it, commands may later adopt the
/// running daemon's directory.
fn init_config_dir(config_dir: Option<String>) -> Result<()> {
    if config_dir.is_some() {
        config::set_config_dir(config_dir)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            init_config_dir(config_dir)?;
            Themeshift::new(debug_enabled).run()
        }
        CliAction::SwitchCommand {
            debug_enabled,
            config_dir,
        } => {
            init_config_dir(config_dir)?;
            commands::switch::handle_switch_command(debug_enabled)
        }
        CliAction::ConfigureCommand {
            debug_enabled,
            config_dir,
        } => {
            init_config_dir(config_dir)?;
            commands::configure::handle_configure_command(debug_enabled)
        }
        CliAction::StatusCommand {
            debug_enabled,
            config_dir,
            at_hour,
        } => {
            init_config_dir(config_dir)?;
            commands::status::handle_status_command(at_hour, debug_enabled)
        }
        CliAction::GetCommand {
            debug_enabled: _,
            config_dir,
            fields,
            json,
        } => {
            init_config_dir(config_dir)?;
            commands::get::handle_get_command(&fields, json)
        }
        CliAction::SetCommand {
            debug_enabled: _,
            config_dir,
            fields,
        } => {
            init_config_dir(config_dir)?;
            commands::set::handle_set_command(&fields)
        }
        CliAction::ListCommand {
            debug_enabled,
            config_dir,
        } => {
            init_config_dir(config_dir)?;
            commands::list::handle_list_command(debug_enabled)
        }
    }
}
