//! Settings file watching for live reloads.
//!
//! Edits to `themeshift.toml` (by hand, by `themeshift set`, or by the setup
//! flow) are turned into [`SignalMessage::SettingsChanged`] for the main loop.
//! The parent directory is watched rather than the file itself so that
//! editors replacing the file by rename are still noticed.

use anyhow::{Context, Result};
use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::SETTINGS_DEBOUNCE_MS;
use crate::signals::SignalMessage;
use crate::utils::private_path;

/// Keeps the file watcher alive. Dropping it stops the watcher thread.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl SettingsWatcher {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when a filesystem event path refers to the watched settings file.
pub fn is_settings_event(event_path: &Path, settings_path: &Path) -> bool {
    event_path == settings_path
        || (event_path.parent() == settings_path.parent()
            && event_path.file_name().is_some()
            && event_path.file_name() == settings_path.file_name())
}

/// Turn each burst of settings file events into one
/// [`SignalMessage::SettingsChanged`].
///
/// A burst ends once no matching event has arrived for `quiet`, so the
/// message always follows the last write. Returns when either channel closes.
fn forward_settings_changes(
    events: &Receiver<Event>,
    watched: &Path,
    signal_sender: &Sender<SignalMessage>,
    quiet: Duration,
    debug_enabled: bool,
) {
    let touches_settings =
        |event: &Event| event.paths.iter().any(|path| is_settings_event(path, watched));

    loop {
        // Wait for the first event of a burst
        loop {
            match events.recv() {
                Ok(event) if touches_settings(&event) => break,
                Ok(_) => {}
                Err(_) => return,
            }
        }

        let mut deadline = Instant::now() + quiet;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match events.recv_timeout(remaining) {
                Ok(event) if touches_settings(&event) => {
                    deadline = Instant::now() + quiet;
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        if debug_enabled {
            log_pipe!();
            log_debug!("Settings file change detected");
        }

        if signal_sender.send(SignalMessage::SettingsChanged).is_err() {
            return;
        }
    }
}

/// Start watching the settings file.
///
/// Change events are debounced and forwarded to `signal_sender`. The thread
/// ends when the returned guard is dropped or the receiver goes away.
pub fn start_settings_watcher(
    settings_path: &Path,
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
) -> Result<SettingsWatcher> {
    let parent = settings_path
        .parent()
        .context("Settings file has no parent directory")?
        .to_path_buf();

    let (tx, rx) = std::sync::mpsc::channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                )
            {
                let _ = tx.send(event);
            }
        },
        NotifyConfig::default(),
    )
    .context("Failed to create file watcher")?;

    watcher
        .watch(&parent, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch directory: {}", private_path(&parent)))?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Watching settings for changes:");
        log_indented!("{}", private_path(settings_path));
    }

    let watched = settings_path.to_path_buf();
    thread::spawn(move || {
        forward_settings_changes(
            &rx,
            &watched,
            &signal_sender,
            Duration::from_millis(SETTINGS_DEBOUNCE_MS),
            debug_enabled,
        );
    });

    Ok(SettingsWatcher {
        _watcher: watcher,
        path: settings_path.to_path_buf(),
    })
}
