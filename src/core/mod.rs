//! Decision core: which profile should be active, and applying it once.
//!
//! Every trigger (activation, the periodic tick, a settings change, a manual
//! switch) funnels into [`Core::run_cycle`]:
//!
//! 1. make sure the schedule is complete, prompting for missing fields
//! 2. pick the light or dark profile for the current hour
//! 3. apply it unless it is already the last profile applied
//!
//! The core owns its collaborators as trait objects and takes `&mut self`
//! for every cycle, so cycles never overlap.

pub mod period;
mod setup;

use anyhow::Result;

use crate::backend::ProfileBackend;
use crate::constants::DEFAULT_SHOW_NOTIFICATIONS;
use crate::notification::{Notifier, NotifyLevel};
use crate::prompt::Prompter;
use crate::settings::{PartialSchedule, Schedule, SettingKey, SettingValue, SettingsStore};
use crate::time_source::Clock;

pub use period::Period;

/// What `apply_if_needed` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The backend switched to the profile.
    Applied,
    /// The profile was already the last one applied; nothing was done.
    AlreadyActive,
    /// The profile is not in the backend's catalog.
    ProfileNotFound,
    /// Listing the catalog or applying the profile failed.
    Failed,
}

/// Result of one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The schedule is still incomplete after setup.
    Unconfigured,
    Evaluated {
        period: Period,
        profile: String,
        outcome: ApplyOutcome,
    },
}

/// Select the profile for `hour`.
pub fn decide(hour: u8, schedule: &Schedule) -> &str {
    Period::for_hour(hour, schedule.start_hour, schedule.end_hour).profile(schedule)
}

/// Parameters for creating a Core instance.
pub struct CoreParams {
    pub backend: Box<dyn ProfileBackend>,
    pub settings: Box<dyn SettingsStore>,
    pub prompter: Box<dyn Prompter>,
    pub notifier: Box<dyn Notifier>,
    pub clock: Box<dyn Clock>,
    /// Run the backend's refresh hook before each real switch.
    pub force_refresh: bool,
    pub debug_enabled: bool,
}

/// The scheduling state machine.
pub struct Core {
    backend: Box<dyn ProfileBackend>,
    settings: Box<dyn SettingsStore>,
    prompter: Box<dyn Prompter>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    force_refresh: bool,
    debug_enabled: bool,
    /// Last profile successfully applied by this process.
    last_applied: Option<String>,
}

impl Core {
    pub fn new(params: CoreParams) -> Self {
        Self {
            backend: params.backend,
            settings: params.settings,
            prompter: params.prompter,
            notifier: params.notifier,
            clock: params.clock,
            force_refresh: params.force_refresh,
            debug_enabled: params.debug_enabled,
            last_applied: None,
        }
    }

    pub fn last_applied(&self) -> Option<&str> {
        self.last_applied.as_deref()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Swap in a new backend. The new host's state is unknown, so the next
    /// cycle applies unconditionally.
    pub fn replace_backend(&mut self, backend: Box<dyn ProfileBackend>) {
        self.backend = backend;
        self.last_applied = None;
    }

    pub fn replace_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    pub fn set_force_refresh(&mut self, enabled: bool) {
        self.force_refresh = enabled;
    }

    /// Current stored schedule fields.
    pub fn read_schedule(&self) -> Result<PartialSchedule> {
        PartialSchedule::read(self.settings.as_ref())
    }

    /// Apply `selected` unless it is unknown or already active.
    pub fn apply_if_needed(&mut self, selected: &str) -> Result<ApplyOutcome> {
        let catalog = match self.backend.list_profiles() {
            Ok(catalog) => catalog,
            Err(e) => {
                self.notifier.notify(
                    &format!("Failed to list {} profiles: {e}", self.backend.backend_name()),
                    NotifyLevel::Error,
                );
                return Ok(ApplyOutcome::Failed);
            }
        };

        if !catalog.iter().any(|profile| profile == selected) {
            self.notifier
                .notify(&format!("Profile '{selected}' not found"), NotifyLevel::Error);
            return Ok(ApplyOutcome::ProfileNotFound);
        }

        if self.last_applied.as_deref() == Some(selected) {
            if self.debug_enabled {
                log_pipe!();
                log_debug!("Profile '{selected}' already active");
            }
            return Ok(ApplyOutcome::AlreadyActive);
        }

        if self.force_refresh
            && let Err(e) = self.backend.force_refresh(selected)
        {
            log_pipe!();
            log_warning!("Force refresh before '{selected}' failed: {e}");
        }

        match self.backend.apply_profile(selected) {
            Ok(()) => {
                self.last_applied = Some(selected.to_string());
                let show_notifications = self.settings.show_notifications().unwrap_or_else(|e| {
                    log_pipe!();
                    log_warning!("Failed to read show_notifications: {e}");
                    DEFAULT_SHOW_NOTIFICATIONS
                });
                if show_notifications {
                    self.notifier
                        .notify(&format!("Switched to '{selected}'"), NotifyLevel::Info);
                } else {
                    log_block_start!("Switched to '{selected}'");
                }
                Ok(ApplyOutcome::Applied)
            }
            Err(e) => {
                self.notifier.notify(
                    &format!("Failed to apply profile '{selected}': {e}"),
                    NotifyLevel::Error,
                );
                Ok(ApplyOutcome::Failed)
            }
        }
    }

    /// One full evaluation: setup if needed, decide, apply if needed.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let Some(schedule) = self.ensure_configured()? else {
            return Ok(CycleOutcome::Unconfigured);
        };

        let hour = self.clock.current_hour();
        let period = Period::for_hour(hour, schedule.start_hour, schedule.end_hour);
        let profile = period.profile(&schedule).to_string();

        if self.debug_enabled {
            log_pipe!();
            log_debug!(
                "Hour {hour:02} in window {:02}-{:02}: {period}",
                schedule.start_hour,
                schedule.end_hour
            );
        }

        let outcome = self.apply_if_needed(&profile)?;
        Ok(CycleOutcome::Evaluated {
            period,
            profile,
            outcome,
        })
    }

    /// The activation trigger: welcome on first run, then one cycle.
    pub fn activate(&mut self) -> Result<CycleOutcome> {
        let first_run = self.settings.first_run()?;
        if first_run {
            log_block_start!("Welcome to themeshift");
            log_indented!("Pick a light and a dark profile and the hours to use them");
            log_indented!("Run 'themeshift configure' at any time to change them");
        }

        let outcome = self.run_cycle()?;

        if first_run && outcome != CycleOutcome::Unconfigured {
            self.settings
                .set(SettingKey::FirstRun, SettingValue::Flag(false))?;
        }
        Ok(outcome)
    }
}
