//! Fakes for driving [`crate::core::Core`] from integration tests.
//!
//! Each fake is `Clone` and clones share state, so a test can move one clone
//! into the core and inspect another.

use anyhow::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::backend::ProfileBackend;
use crate::notification::{Notifier, NotifyLevel};
use crate::prompt::Prompter;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One scripted prompt answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Pick(String),
    Integer(i64),
    Cancel,
    /// Stop setup, like Ctrl+C or a pending shutdown.
    Interrupt,
}

/// Prompter that replays answers in order and cancels once they run out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<ScriptedAnswer>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    interrupted: Arc<Mutex<bool>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            ..Default::default()
        }
    }

    /// Prompt texts shown so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    fn next(&self, prompt: &str) -> Option<ScriptedAnswer> {
        lock(&self.prompts).push(prompt.to_string());
        let answer = lock(&self.answers).pop_front();
        if answer == Some(ScriptedAnswer::Interrupt) {
            *lock(&self.interrupted) = true;
        }
        answer
    }
}

impl Prompter for ScriptedPrompter {
    fn pick_one(&mut self, options: &[String], prompt: &str) -> Result<Option<String>> {
        match self.next(prompt) {
            Some(ScriptedAnswer::Pick(choice)) if options.contains(&choice) => Ok(Some(choice)),
            Some(ScriptedAnswer::Pick(choice)) => {
                anyhow::bail!("scripted pick '{choice}' is not among the options")
            }
            _ => Ok(None),
        }
    }

    fn prompt_integer(&mut self, prompt: &str, min: i64, max: i64) -> Result<Option<i64>> {
        // Out-of-range answers are re-prompted like a real terminal would
        loop {
            match self.next(prompt) {
                Some(ScriptedAnswer::Integer(value)) if (min..=max).contains(&value) => {
                    return Ok(Some(value));
                }
                Some(ScriptedAnswer::Integer(_)) => continue,
                _ => return Ok(None),
            }
        }
    }

    fn interrupted(&self) -> bool {
        *lock(&self.interrupted)
    }
}

/// In-memory backend that records every applied profile.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    profiles: Arc<Mutex<Vec<String>>>,
    applied: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeBackend {
    pub fn new<S: Into<String>>(profiles: impl IntoIterator<Item = S>) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles.into_iter().map(Into::into).collect())),
            ..Default::default()
        }
    }

    /// Profiles applied so far, oldest first.
    pub fn applied(&self) -> Vec<String> {
        lock(&self.applied).clone()
    }

    /// Make every following apply fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    pub fn set_profiles<S: Into<String>>(&self, profiles: impl IntoIterator<Item = S>) {
        *lock(&self.profiles) = profiles.into_iter().map(Into::into).collect();
    }
}

impl ProfileBackend for FakeBackend {
    fn list_profiles(&self) -> Result<Vec<String>> {
        Ok(lock(&self.profiles).clone())
    }

    fn apply_profile(&mut self, profile: &str) -> Result<()> {
        if *lock(&self.failing) {
            anyhow::bail!("fake backend refused '{profile}'");
        }
        lock(&self.applied).push(profile.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Fake"
    }
}

/// Notifier that keeps every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, NotifyLevel)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, NotifyLevel)> {
        lock(&self.messages).clone()
    }

    pub fn count(&self, level: NotifyLevel) -> usize {
        lock(&self.messages)
            .iter()
            .filter(|(_, recorded)| *recorded == level)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        lock(&self.messages).push((message.to_string(), level));
    }
}
