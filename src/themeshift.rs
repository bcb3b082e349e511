//! Application coordinator that manages the lifecycle of the themeshift daemon.
//!
//! This module acquires resources, wires the collaborators into a [`Core`]
//! and runs the main loop:
//! - Lock file management for single-instance enforcement
//! - Configuration loading and backend creation
//! - Signal handler and settings watcher setup
//! - Activation, then one cycle per trigger until shutdown

use anyhow::{Context, Result};
use std::sync::mpsc::RecvTimeoutError;

use crate::{
    backend::{ProfileBackend, backend_from_config},
    config::{self, Config},
    constants::*,
    core::{ApplyOutcome, Core, CoreParams, CycleOutcome},
    io::lock::{LockOutcome, acquire_lock},
    notification::create_notifier,
    prompt::TerminalPrompter,
    settings::FileSettingsStore,
    signals::{SignalMessage, setup_signal_handler},
    time_source::SystemClock,
};

/// Build a [`Core`] wired to the host: the settings file, the given terminal
/// prompter, the configured notifier and the system clock.
pub fn create_core(
    config: &Config,
    backend: Box<dyn ProfileBackend>,
    prompter: TerminalPrompter,
    debug_enabled: bool,
) -> Result<Core> {
    let settings = FileSettingsStore::from_config_path()?;
    Ok(Core::new(CoreParams {
        backend,
        settings: Box::new(settings),
        prompter: Box::new(prompter),
        notifier: create_notifier(config.desktop_notifications()),
        clock: Box::new(SystemClock),
        force_refresh: config.force_refresh(),
        debug_enabled,
    }))
}

/// Log the result of a cycle. Cycle errors never stop the daemon.
pub fn report_cycle(result: Result<CycleOutcome>, debug_enabled: bool) {
    match result {
        Ok(CycleOutcome::Unconfigured) => {
            log_pipe!();
            log_warning!("Schedule not configured; nothing applied");
        }
        Ok(CycleOutcome::Evaluated {
            period,
            profile,
            outcome,
        }) => {
            if debug_enabled || outcome != ApplyOutcome::AlreadyActive {
                log_decorated!("{} {} period: {profile}", period.symbol(), period.display_name());
            }
        }
        Err(e) => {
            log_pipe!();
            log_error!("Check failed: {e:#}");
        }
    }
}

/// The themeshift daemon.
///
/// # Examples
///
/// ```no_run
/// use themeshift::Themeshift;
///
/// # fn main() -> anyhow::Result<()> {
/// Themeshift::new(false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Themeshift {
    debug_enabled: bool,
}

impl Themeshift {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }

    /// Run the daemon until a shutdown signal arrives.
    pub fn run(self) -> Result<()> {
        log_version!();

        // Take the lock before anything else writes to the terminal
        let lock = match acquire_lock()? {
            LockOutcome::Acquired(lock) => lock,
            LockOutcome::Held { pid } => {
                log_error_exit!("themeshift is already running");
                if let Some(pid) = pid {
                    log_indented!("PID: {pid}");
                }
                log_indented!("Use 'themeshift switch' to trigger a check");
                std::process::exit(EXIT_FAILURE);
            }
        };

        let mut config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{e:?}");
                std::process::exit(EXIT_FAILURE);
            }
        };

        let backend = match backend_from_config(&config, self.debug_enabled) {
            Ok(backend) => backend,
            Err(e) => {
                log_error_exit!("No usable backend");
                eprintln!("{e:?}");
                std::process::exit(EXIT_FAILURE);
            }
        };

        config.log_config(backend.backend_name());

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        let settings_path = Config::get_config_path()?;
        let watcher = match config::start_settings_watcher(
            &settings_path,
            signal_state.signal_sender.clone(),
            self.debug_enabled,
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log_pipe!();
                log_warning!("Settings file watching unavailable: {e}");
                log_indented!("Use 'themeshift switch' after editing settings");
                None
            }
        };

        let prompter = TerminalPrompter::new().with_shutdown_flag(signal_state.shutdown_flag());
        let mut core = create_core(&config, backend, prompter, self.debug_enabled)
            .context("Failed to initialize the decision core")?;

        log_block_start!("Lock acquired, starting themeshift...");

        report_cycle(core.activate(), self.debug_enabled);

        loop {
            match signal_state
                .signal_receiver
                .recv_timeout(config.check_interval())
            {
                Ok(SignalMessage::Check) => {
                    if self.debug_enabled {
                        log_pipe!();
                        log_debug!("Manual check requested");
                    }
                    report_cycle(core.run_cycle(), self.debug_enabled);
                }
                Ok(SignalMessage::SettingsChanged) => {
                    reload_config(&mut core, &mut config, self.debug_enabled);
                    report_cycle(core.run_cycle(), self.debug_enabled);
                }
                Ok(SignalMessage::Shutdown) => {
                    log_block_start!("Shutting down themeshift...");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    report_cycle(core.run_cycle(), self.debug_enabled);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log_pipe!();
                    log_error!("Signal handler disconnected unexpectedly");
                    break;
                }
            }
        }

        drop(watcher);
        drop(signal_state);
        drop(lock);
        log_end!();
        Ok(())
    }
}

/// Re-read the configuration file and apply what changed.
///
/// A config that fails to load or a backend that fails to build is logged
/// and the previous one stays in use.
fn reload_config(core: &mut Core, config: &mut Config, debug_enabled: bool) {
    let new_config = match Config::load() {
        Ok(new_config) => new_config,
        Err(e) => {
            log_pipe!();
            log_warning!("Keeping previous configuration: {e:#}");
            return;
        }
    };

    if *config == new_config {
        if debug_enabled {
            log_pipe!();
            log_debug!("Configuration unchanged");
        }
        return;
    }

    if config.backend_changed(&new_config) {
        match backend_from_config(&new_config, debug_enabled) {
            Ok(backend) => {
                log_block_start!("Switched backend to {}", backend.backend_name());
                core.replace_backend(backend);
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Keeping previous backend: {e:#}");
                return;
            }
        }
    }

    if config.desktop_notifications() != new_config.desktop_notifications() {
        core.replace_notifier(create_notifier(new_config.desktop_notifications()));
    }
    core.set_force_refresh(new_config.force_refresh());

    new_config.log_config(core.backend_name());
    *config = new_config;
}
