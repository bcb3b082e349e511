//! First-run and on-demand setup of the schedule.

use anyhow::Result;

use super::Core;
use crate::constants::*;
use crate::settings::{PartialSchedule, Schedule, SettingKey, SettingValue};

impl Core {
    /// Return the stored schedule, running setup while fields are missing.
    ///
    /// Setup runs at most [`MAX_SETUP_PASSES`] times and stops as soon as a
    /// pass saves nothing. `Ok(None)` means the schedule is still incomplete.
    pub fn ensure_configured(&mut self) -> Result<Option<Schedule>> {
        for pass in 1..=MAX_SETUP_PASSES {
            let partial = self.read_schedule()?;
            if let Some(schedule) = partial.complete() {
                return Ok(Some(schedule));
            }

            log_block_start!("Schedule is incomplete");
            log_indented!("Missing: {}", missing_names(&partial));
            if self.debug_enabled {
                log_debug!("Setup pass {pass} of {MAX_SETUP_PASSES}");
            }

            let saved = self.prompt_for_settings()?;
            if self.prompter.interrupted() {
                log_pipe!();
                log_warning!("Setup interrupted; {saved} setting(s) saved");
                return Ok(None);
            }
            if saved == 0 {
                log_pipe!();
                log_warning!("No settings were saved; will check again later");
                return Ok(None);
            }
        }

        let partial = self.read_schedule()?;
        if partial.complete().is_none() {
            log_pipe!();
            log_warning!(
                "Schedule still incomplete after {MAX_SETUP_PASSES} setup passes (missing: {})",
                missing_names(&partial)
            );
        }
        Ok(partial.complete())
    }

    /// Ask for all four schedule fields in order, saving each answer as it
    /// arrives. Returns how many fields were saved.
    pub fn prompt_for_settings(&mut self) -> Result<usize> {
        let catalog = match self.backend.list_profiles() {
            Ok(catalog) if catalog.is_empty() => {
                log_pipe!();
                log_warning!("The {} backend reports no profiles", self.backend.backend_name());
                None
            }
            Ok(catalog) => Some(catalog),
            Err(e) => {
                log_pipe!();
                log_error!("Failed to list profiles: {e}");
                None
            }
        };

        let mut saved = 0;

        for (key, prompt) in [
            (SettingKey::LightProfile, "Select the light profile"),
            (SettingKey::DarkProfile, "Select the dark profile"),
        ] {
            let Some(ref catalog) = catalog else {
                continue;
            };
            if self.prompter.interrupted() {
                break;
            }
            if let Some(profile) = self.prompter.pick_one(catalog, prompt)? {
                self.settings.set(key, SettingValue::Text(profile))?;
                saved += 1;
            }
        }

        for (key, prompt) in [
            (SettingKey::StartHour, "Hour the light profile starts"),
            (SettingKey::EndHour, "Hour the dark profile starts"),
        ] {
            if self.prompter.interrupted() {
                break;
            }
            let answer = self.prompter.prompt_integer(
                prompt,
                i64::from(MINIMUM_HOUR),
                i64::from(MAXIMUM_HOUR),
            )?;
            let Some(value) = answer else {
                continue;
            };
            match u8::try_from(value).ok().filter(|hour| *hour <= MAXIMUM_HOUR) {
                Some(hour) => {
                    self.settings.set(key, SettingValue::Hour(hour))?;
                    saved += 1;
                }
                None => {
                    log_pipe!();
                    log_warning!("Ignoring {key} = {value}: out of range");
                }
            }
        }

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Saved {saved} setting(s)");
        }
        Ok(saved)
    }

    /// The manual configure trigger: prompt for every field, whether or not
    /// the schedule is already complete.
    pub fn configure(&mut self) -> Result<usize> {
        let saved = self.prompt_for_settings()?;
        log_block_start!("Saved {saved} of 4 schedule settings");
        Ok(saved)
    }
}

fn missing_names(partial: &PartialSchedule) -> String {
    partial
        .missing()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::super::{ApplyOutcome, CoreParams, CycleOutcome, Period};
    use super::*;
    use crate::backend::MockProfileBackend;
    use crate::notification::{Notifier, NotifyLevel};
    use crate::prompt::Prompter;
    use crate::settings::{MemorySettingsStore, SettingsStore};
    use crate::time_source::FixedClock;
    use mockall::predicate::eq;
    use std::collections::VecDeque;

    enum Answer {
        Pick(&'static str),
        Hour(i64),
        Cancel,
        Interrupt,
    }

    /// Replays answers in order, cancelling once they run out.
    struct Script {
        answers: VecDeque<Answer>,
        asked: std::rc::Rc<std::cell::Cell<usize>>,
        interrupted: bool,
    }

    impl Script {
        fn new(answers: Vec<Answer>) -> (Self, std::rc::Rc<std::cell::Cell<usize>>) {
            let asked = std::rc::Rc::new(std::cell::Cell::new(0));
            (
                Self {
                    answers: answers.into(),
                    asked: asked.clone(),
                    interrupted: false,
                },
                asked,
            )
        }

        fn next(&mut self) -> Option<Answer> {
            self.asked.set(self.asked.get() + 1);
            let answer = self.answers.pop_front();
            if matches!(answer, Some(Answer::Interrupt)) {
                self.interrupted = true;
            }
            answer
        }
    }

    impl Prompter for Script {
        fn pick_one(&mut self, options: &[String], _: &str) -> Result<Option<String>> {
            match self.next() {
                Some(Answer::Pick(choice)) => {
                    assert!(options.iter().any(|o| o == choice));
                    Ok(Some(choice.to_string()))
                }
                _ => Ok(None),
            }
        }

        fn prompt_integer(&mut self, _: &str, _: i64, _: i64) -> Result<Option<i64>> {
            match self.next() {
                Some(Answer::Hour(hour)) => Ok(Some(hour)),
                _ => Ok(None),
            }
        }

        fn interrupted(&self) -> bool {
            self.interrupted
        }
    }

    struct Quiet;

    impl Notifier for Quiet {
        fn notify(&self, _: &str, _: NotifyLevel) {}
    }

    fn catalog() -> Vec<String> {
        ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
    }

    fn core(backend: MockProfileBackend, settings: MemorySettingsStore, prompter: Script) -> Core {
        Core::new(CoreParams {
            backend: Box::new(backend),
            settings: Box::new(settings),
            prompter: Box::new(prompter),
            notifier: Box::new(Quiet),
            clock: Box::new(FixedClock(12)),
            force_refresh: false,
            debug_enabled: false,
        })
    }

    fn listing_backend() -> MockProfileBackend {
        let mut backend = MockProfileBackend::new();
        backend.expect_list_profiles().returning(|| Ok(catalog()));
        backend.expect_backend_name().return_const("Mock");
        backend
    }

    #[test]
    fn test_complete_schedule_never_prompts() {
        // start == end is degenerate but complete
        let settings = MemorySettingsStore::new()
            .with(SettingKey::LightProfile, SettingValue::Text("A".into()))
            .and_then(|s| s.with(SettingKey::DarkProfile, SettingValue::Text("B".into())))
            .and_then(|s| s.with(SettingKey::StartHour, SettingValue::Hour(12)))
            .and_then(|s| s.with(SettingKey::EndHour, SettingValue::Hour(12)))
            .unwrap();
        let (script, asked) = Script::new(Vec::new());
        let mut core = core(listing_backend(), settings, script);

        let schedule = core.ensure_configured().unwrap().unwrap();
        assert_eq!(schedule.start_hour, schedule.end_hour);
        assert_eq!(asked.get(), 0);
    }

    #[test]
    fn test_each_missing_field_triggers_setup() {
        for missing in SettingKey::SCHEDULE {
            let mut settings = MemorySettingsStore::new()
                .with(SettingKey::LightProfile, SettingValue::Text("A".into()))
                .and_then(|s| s.with(SettingKey::DarkProfile, SettingValue::Text("B".into())))
                .and_then(|s| s.with(SettingKey::StartHour, SettingValue::Hour(9)))
                .and_then(|s| s.with(SettingKey::EndHour, SettingValue::Hour(18)))
                .unwrap();
            settings.clear(missing);
            // An empty profile string reads as missing too
            if missing == SettingKey::LightProfile {
                settings
                    .set(missing, SettingValue::Text(String::new()))
                    .unwrap();
            }

            let (script, asked) = Script::new(Vec::new());
            let mut core = core(listing_backend(), settings, script);
            assert_eq!(core.ensure_configured().unwrap(), None, "{missing}");
            assert_eq!(asked.get(), 4, "{missing}");
        }
    }

    #[test]
    fn test_partial_first_run_setup() {
        let mut backend = listing_backend();
        backend.expect_apply_profile().never();

        let settings = MemorySettingsStore::new();
        let view = settings.clone();
        let (script, _) = Script::new(vec![
            Answer::Pick("A"),
            Answer::Cancel,
            Answer::Hour(9),
            Answer::Hour(18),
        ]);
        let mut core = core(backend, settings, script);

        assert_eq!(core.run_cycle().unwrap(), CycleOutcome::Unconfigured);

        let partial = PartialSchedule::read(&view).unwrap();
        assert_eq!(partial.light_profile.as_deref(), Some("A"));
        assert_eq!(partial.dark_profile, None);
        assert_eq!(partial.start_hour, Some(9));
        assert_eq!(partial.end_hour, Some(18));
        assert_eq!(partial.missing(), vec![SettingKey::DarkProfile]);
    }

    #[test]
    fn test_second_pass_completes_setup_and_applies() {
        let mut backend = listing_backend();
        backend
            .expect_apply_profile()
            .with(eq("A"))
            .times(1)
            .returning(|_| Ok(()));

        let (script, _) = Script::new(vec![
            Answer::Pick("A"),
            Answer::Cancel,
            Answer::Hour(9),
            Answer::Hour(18),
            // Second pass: every field asked again, only dark answered
            Answer::Cancel,
            Answer::Pick("B"),
            Answer::Cancel,
            Answer::Cancel,
        ]);
        let mut core = core(backend, MemorySettingsStore::new(), script);

        assert_eq!(
            core.run_cycle().unwrap(),
            CycleOutcome::Evaluated {
                period: Period::Light,
                profile: "A".to_string(),
                outcome: ApplyOutcome::Applied,
            }
        );
    }

    #[test]
    fn test_setup_is_bounded() {
        // Every pass saves an hour but never a profile
        let answers = (0..MAX_SETUP_PASSES + 2)
            .flat_map(|_| [Answer::Cancel, Answer::Cancel, Answer::Hour(9), Answer::Cancel])
            .collect();
        let (script, asked) = Script::new(answers);
        let mut core = core(listing_backend(), MemorySettingsStore::new(), script);

        assert_eq!(core.ensure_configured().unwrap(), None);
        assert_eq!(asked.get(), 4 * MAX_SETUP_PASSES);
    }

    #[test]
    fn test_interrupt_stops_remaining_prompts_and_passes() {
        let mut backend = listing_backend();
        backend.expect_apply_profile().never();

        let settings = MemorySettingsStore::new();
        let view = settings.clone();
        let (script, asked) = Script::new(vec![
            Answer::Pick("A"),
            Answer::Interrupt,
            Answer::Hour(9),
            Answer::Hour(18),
        ]);
        let mut core = core(backend, settings, script);

        assert_eq!(core.run_cycle().unwrap(), CycleOutcome::Unconfigured);
        assert_eq!(asked.get(), 2);
        let partial = PartialSchedule::read(&view).unwrap();
        assert_eq!(partial.light_profile.as_deref(), Some("A"));
        assert_eq!(partial.start_hour, None);
    }

    #[test]
    fn test_unlistable_catalog_skips_profile_prompts() {
        let mut backend = MockProfileBackend::new();
        backend
            .expect_list_profiles()
            .returning(|| Err(anyhow::anyhow!("no host")));
        backend.expect_backend_name().return_const("Mock");

        let settings = MemorySettingsStore::new();
        let view = settings.clone();
        let (script, asked) = Script::new(vec![Answer::Hour(7), Answer::Hour(19)]);
        let mut core = core(backend, settings, script);

        assert_eq!(core.prompt_for_settings().unwrap(), 2);
        assert_eq!(asked.get(), 2);
        assert_eq!(
            view.get(SettingKey::EndHour).unwrap(),
            Some(SettingValue::Hour(19))
        );
    }

    #[test]
    fn test_out_of_range_answer_is_not_saved() {
        let settings = MemorySettingsStore::new();
        let view = settings.clone();
        let (script, _) = Script::new(vec![
            Answer::Cancel,
            Answer::Cancel,
            Answer::Hour(24),
            Answer::Hour(-1),
        ]);
        let mut core = core(listing_backend(), settings, script);

        assert_eq!(core.prompt_for_settings().unwrap(), 0);
        assert_eq!(view.get(SettingKey::StartHour).unwrap(), None);
    }

    #[test]
    fn test_configure_overwrites_complete_schedule() {
        let settings = MemorySettingsStore::new()
            .with(SettingKey::LightProfile, SettingValue::Text("A".into()))
            .and_then(|s| s.with(SettingKey::DarkProfile, SettingValue::Text("B".into())))
            .and_then(|s| s.with(SettingKey::StartHour, SettingValue::Hour(9)))
            .and_then(|s| s.with(SettingKey::EndHour, SettingValue::Hour(18)))
            .unwrap();
        let view = settings.clone();
        let (script, asked) = Script::new(vec![Answer::Cancel, Answer::Pick("C")]);
        let mut core = core(listing_backend(), settings, script);

        assert_eq!(core.configure().unwrap(), 1);
        assert_eq!(asked.get(), 4);
        assert_eq!(
            view.get(SettingKey::DarkProfile).unwrap(),
            Some(SettingValue::Text("C".into()))
        );
        assert_eq!(
            view.get(SettingKey::LightProfile).unwrap(),
            Some(SettingValue::Text("A".into()))
        );
    }
}
