use themeshift::core::{ApplyOutcome, Core, CoreParams, CycleOutcome, Period, decide};
use themeshift::notification::NotifyLevel;
use themeshift::settings::{MemorySettingsStore, PartialSchedule, SettingKey, SettingValue, SettingsStore};
use themeshift::testing::{FakeBackend, RecordingNotifier, ScriptedAnswer, ScriptedPrompter};
use themeshift::time_source::ManualClock;

const LIGHT: &str = "Solarized Light";
const DARK: &str = "Solarized Dark";

struct Harness {
    core: Core,
    backend: FakeBackend,
    notifier: RecordingNotifier,
    prompter: ScriptedPrompter,
    settings: MemorySettingsStore,
    clock: ManualClock,
}

// Helper function to wire a core to shared fakes
fn harness(settings: MemorySettingsStore, answers: Vec<ScriptedAnswer>, hour: u8) -> Harness {
    let backend = FakeBackend::new([LIGHT, DARK, "Monokai"]);
    let notifier = RecordingNotifier::new();
    let prompter = ScriptedPrompter::new(answers);
    let clock = ManualClock::new(hour);

    let core = Core::new(CoreParams {
        backend: Box::new(backend.clone()),
        settings: Box::new(settings.clone()),
        prompter: Box::new(prompter.clone()),
        notifier: Box::new(notifier.clone()),
        clock: Box::new(clock.clone()),
        force_refresh: false,
        debug_enabled: false,
    });

    Harness {
        core,
        backend,
        notifier,
        prompter,
        settings,
        clock,
    }
}

fn solarized() -> MemorySettingsStore {
    MemorySettingsStore::new()
        .with(SettingKey::LightProfile, SettingValue::Text(LIGHT.into()))
        .and_then(|s| s.with(SettingKey::DarkProfile, SettingValue::Text(DARK.into())))
        .and_then(|s| s.with(SettingKey::StartHour, SettingValue::Hour(8)))
        .and_then(|s| s.with(SettingKey::EndHour, SettingValue::Hour(20)))
        .unwrap()
}

#[test]
fn test_solarized_schedule_over_a_day() {
    let schedule = PartialSchedule::read(&solarized()).unwrap().complete().unwrap();
    assert_eq!(decide(14, &schedule), LIGHT);
    assert_eq!(decide(20, &schedule), DARK);
    assert_eq!(decide(7, &schedule), DARK);

    let mut h = harness(solarized(), Vec::new(), 0);
    for hour in 0..24u8 {
        h.clock.set_hour(hour);
        h.core.run_cycle().unwrap();
    }
    // Dark at midnight, light at 08:00, dark again at 20:00
    assert_eq!(h.backend.applied(), vec![DARK, LIGHT, DARK]);
    assert_eq!(h.notifier.count(NotifyLevel::Info), 3);
    assert_eq!(h.notifier.count(NotifyLevel::Error), 0);
}

#[test]
fn test_ticks_in_same_hour_apply_once() {
    let mut h = harness(solarized(), Vec::new(), 14);
    for _ in 0..5 {
        h.core.run_cycle().unwrap();
    }
    assert_eq!(h.backend.applied(), vec![LIGHT]);
    assert_eq!(h.core.last_applied(), Some(LIGHT));
}

#[test]
fn test_first_run_prompts_and_applies() {
    let answers = vec![
        ScriptedAnswer::Pick(LIGHT.into()),
        ScriptedAnswer::Pick(DARK.into()),
        ScriptedAnswer::Integer(8),
        ScriptedAnswer::Integer(20),
    ];
    let mut h = harness(MemorySettingsStore::new(), answers, 21);

    let outcome = h.core.activate().unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Evaluated {
            period: Period::Dark,
            profile: DARK.to_string(),
            outcome: ApplyOutcome::Applied,
        }
    );
    assert_eq!(h.prompter.prompts().len(), 4);
    assert!(!h.settings.first_run().unwrap());
    assert_eq!(h.backend.applied(), vec![DARK]);
}

#[test]
fn test_partial_first_run_defers_to_next_trigger() {
    let answers = vec![
        ScriptedAnswer::Pick("Monokai".into()),
        ScriptedAnswer::Cancel,
        ScriptedAnswer::Integer(9),
        ScriptedAnswer::Integer(18),
    ];
    let mut h = harness(MemorySettingsStore::new(), answers, 10);

    assert_eq!(h.core.activate().unwrap(), CycleOutcome::Unconfigured);
    assert!(h.backend.applied().is_empty());
    assert!(h.settings.first_run().unwrap());

    let partial = PartialSchedule::read(&h.settings).unwrap();
    assert_eq!(partial.light_profile.as_deref(), Some("Monokai"));
    assert_eq!(partial.dark_profile, None);
    assert_eq!((partial.start_hour, partial.end_hour), (Some(9), Some(18)));

    // The missing field is supplied by hand; the next tick applies
    h.settings
        .set(SettingKey::DarkProfile, SettingValue::Text(DARK.into()))
        .unwrap();
    h.core.run_cycle().unwrap();
    assert_eq!(h.backend.applied(), vec!["Monokai"]);
}

#[test]
fn test_interrupted_first_run_asks_nothing_more() {
    let answers = vec![
        ScriptedAnswer::Interrupt,
        ScriptedAnswer::Pick(DARK.into()),
        ScriptedAnswer::Integer(8),
        ScriptedAnswer::Integer(20),
    ];
    let mut h = harness(MemorySettingsStore::new(), answers, 12);

    assert_eq!(h.core.activate().unwrap(), CycleOutcome::Unconfigured);
    assert_eq!(h.prompter.prompts().len(), 1);
    assert!(h.backend.applied().is_empty());
    assert!(h.settings.first_run().unwrap());
    assert_eq!(PartialSchedule::read(&h.settings).unwrap(), PartialSchedule::default());
}

#[test]
fn test_invalid_hour_answers_are_reprompted() {
    let answers = vec![
        ScriptedAnswer::Cancel,
        ScriptedAnswer::Cancel,
        ScriptedAnswer::Integer(25),
        ScriptedAnswer::Integer(7),
        ScriptedAnswer::Integer(-3),
        ScriptedAnswer::Integer(19),
    ];
    let mut h = harness(MemorySettingsStore::new(), answers, 10);

    assert_eq!(h.core.configure().unwrap(), 2);
    assert_eq!(h.settings.get(SettingKey::StartHour).unwrap(), Some(SettingValue::Hour(7)));
    assert_eq!(h.settings.get(SettingKey::EndHour).unwrap(), Some(SettingValue::Hour(19)));
}

#[test]
fn test_removed_profile_is_reported_not_applied() {
    let mut h = harness(solarized(), Vec::new(), 12);
    h.backend.set_profiles(["Monokai"]);

    let outcome = h.core.run_cycle().unwrap();
    assert!(matches!(
        outcome,
        CycleOutcome::Evaluated {
            outcome: ApplyOutcome::ProfileNotFound,
            ..
        }
    ));
    assert!(h.backend.applied().is_empty());
    assert_eq!(h.notifier.count(NotifyLevel::Error), 1);
}

#[test]
fn test_failed_apply_retries_on_next_tick() {
    let mut h = harness(solarized(), Vec::new(), 12);
    h.backend.set_failing(true);
    h.core.run_cycle().unwrap();
    assert_eq!(h.core.last_applied(), None);
    assert_eq!(h.notifier.count(NotifyLevel::Error), 1);

    h.backend.set_failing(false);
    h.core.run_cycle().unwrap();
    assert_eq!(h.backend.applied(), vec![LIGHT]);
}

#[test]
fn test_quiet_switches_with_notifications_off() {
    let settings = solarized()
        .with(SettingKey::ShowNotifications, SettingValue::Flag(false))
        .unwrap();
    let mut h = harness(settings, Vec::new(), 12);
    h.core.run_cycle().unwrap();
    assert_eq!(h.backend.applied(), vec![LIGHT]);
    assert!(h.notifier.messages().is_empty());
}

#[test]
fn test_settings_change_between_ticks() {
    let mut h = harness(solarized(), Vec::new(), 12);
    h.core.run_cycle().unwrap();

    // Moving the window so 12:00 is outside it switches on the next cycle
    h.settings
        .set(SettingKey::StartHour, SettingValue::Hour(13))
        .unwrap();
    h.core.run_cycle().unwrap();
    assert_eq!(h.backend.applied(), vec![LIGHT, DARK]);
}
