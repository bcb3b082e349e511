//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Global flags (`--debug`,
//! `--config`, `--help`, `--version`) may appear anywhere; the first
//! non-flag argument selects a subcommand.

use crate::constants::{MAXIMUM_HOUR, MINIMUM_HOUR};

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the daemon
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Force a schedule check now
    SwitchCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Prompt for all schedule settings
    ConfigureCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Show the schedule and the profile for an hour
    StatusCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
        at_hour: Option<u8>,
    },
    /// Print setting or configuration fields
    GetCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
        fields: Vec<String>,
        json: bool,
    },
    /// Set setting or configuration fields
    SetCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
        fields: Vec<(String, String)>, // Multiple field-value pairs
    },
    /// List the profiles the backend knows
    ListCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Help for one command, or general help
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Canonical name for a command or its alias.
pub fn canonical_command(name: &str) -> Option<&'static str> {
    match name {
        "switch" | "s" => Some("switch"),
        "configure" | "c" => Some("configure"),
        "status" => Some("status"),
        "get" => Some("get"),
        "set" => Some("set"),
        "list" | "l" => Some("list"),
        "help" => Some("help"),
        _ => None,
    }
}

fn error() -> ParsedArgs {
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut json = false;
        let mut at_hour: Option<u8> = None;
        let mut config_dir: Option<String> = None;
        let mut unknown_arg_found = false;
        let mut positional: Vec<String> = Vec::new();

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = &args_vec[i];
            match arg.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--json" => json = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--at" => {
                    // Parse: --at <hour>
                    match args_vec.get(i + 1).map(|value| {
                        crate::prompt::parse_bounded_integer(
                            value,
                            i64::from(MINIMUM_HOUR),
                            i64::from(MAXIMUM_HOUR),
                        )
                    }) {
                        Some(Ok(hour)) => {
                            at_hour = Some(hour as u8);
                            i += 1;
                        }
                        Some(Err(message)) => {
                            log_warning!("Invalid hour for --at: {message}");
                            unknown_arg_found = true;
                            i += 1;
                        }
                        None => {
                            log_warning!("Missing hour for --at. Usage: --at <hour>");
                            unknown_arg_found = true;
                        }
                    }
                }
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    log_warning!("Unknown option: {arg}");
                    unknown_arg_found = true;
                }
                _ => positional.push(arg.clone()),
            }
            i += 1;
        }

        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if unknown_arg_found {
            return error();
        }

        let Some((command, rest)) = positional.split_first() else {
            if json || at_hour.is_some() {
                log_warning!("--json and --at need a command ('get' or 'status')");
                return error();
            }
            let action = if display_help {
                CliAction::ShowHelp
            } else {
                CliAction::Run {
                    debug_enabled,
                    config_dir,
                }
            };
            return ParsedArgs { action };
        };

        let Some(command) = canonical_command(command) else {
            log_warning!("Unknown command: {command}");
            return error();
        };

        // `themeshift <command> --help` is the same as `themeshift help <command>`
        if display_help {
            return ParsedArgs {
                action: CliAction::HelpCommand {
                    command: Some(command.to_string()),
                },
            };
        }

        if json && command != "get" {
            log_warning!("--json is only valid with 'get'");
            return error();
        }
        if at_hour.is_some() && command != "status" {
            log_warning!("--at is only valid with 'status'");
            return error();
        }

        let no_arguments = |usage: &str| -> bool {
            if rest.is_empty() {
                true
            } else {
                log_warning!("Unexpected argument '{}'. Usage: {usage}", rest[0]);
                false
            }
        };

        let action = match command {
            "switch" => {
                if !no_arguments("themeshift switch") {
                    return error();
                }
                CliAction::SwitchCommand {
                    debug_enabled,
                    config_dir,
                }
            }
            "configure" => {
                if !no_arguments("themeshift configure") {
                    return error();
                }
                CliAction::ConfigureCommand {
                    debug_enabled,
                    config_dir,
                }
            }
            "status" => {
                if !no_arguments("themeshift status [--at <hour>]") {
                    return error();
                }
                CliAction::StatusCommand {
                    debug_enabled,
                    config_dir,
                    at_hour,
                }
            }
            "list" => {
                if !no_arguments("themeshift list") {
                    return error();
                }
                CliAction::ListCommand {
                    debug_enabled,
                    config_dir,
                }
            }
            "get" => {
                if rest.is_empty() {
                    log_warning!("Missing field. Usage: themeshift get [--json] <field>... | all");
                    return error();
                }
                CliAction::GetCommand {
                    debug_enabled,
                    config_dir,
                    fields: rest.to_vec(),
                    json,
                }
            }
            "set" => {
                // Parse set command: set <field> <value> [<field> <value>...]
                if rest.is_empty() || rest.len() % 2 != 0 {
                    log_warning!(
                        "Missing field or value. Usage: themeshift set <field> <value> [<field> <value>...]"
                    );
                    log_warning!("Example: themeshift set start_hour 7 end_hour 19");
                    return error();
                }
                CliAction::SetCommand {
                    debug_enabled,
                    config_dir,
                    fields: rest
                        .chunks(2)
                        .map(|pair| (pair[0].clone(), pair[1].clone()))
                        .collect(),
                }
            }
            _ => {
                if rest.len() > 1 {
                    log_warning!("Usage: themeshift help [command]");
                    return error();
                }
                CliAction::HelpCommand {
                    command: rest.first().cloned(),
                }
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("themeshift [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("configure, c           Choose profiles and hours interactively");
    log_indented!("get <field>... | all   Print setting values (--json for JSON)");
    log_indented!("help [command]         Show help for a command");
    log_indented!("list, l                List the profiles the backend knows");
    log_indented!("set <field> <value>... Update setting values");
    log_indented!("status [--at <hour>]   Show the schedule and active period");
    log_indented!("switch, s              Check the schedule and switch now");
    log_block_start!("Without a command, themeshift runs as a daemon.");
    log_end!();
}
