//! Unix signal handling for the daemon.
//!
//! A background thread turns signals into [`SignalMessage`]s on the same
//! channel the settings watcher uses, so the main loop handles every trigger
//! in one place:
//!
//! - SIGINT, SIGTERM, SIGHUP: shut down
//! - SIGUSR1: settings changed, reload
//! - SIGUSR2: check the schedule now

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2},
    iterator::{Handle, Signals},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

/// Messages delivered to the daemon's main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Re-evaluate the schedule now (SIGUSR2 or `themeshift switch`)
    Check,
    /// The settings file changed (SIGUSR1 or file watcher)
    SettingsChanged,
    /// Stop the daemon (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Map a raw signal number to the message it produces.
pub fn message_for_signal(signal: i32) -> Option<SignalMessage> {
    match signal {
        SIGINT | SIGTERM | SIGHUP => Some(SignalMessage::Shutdown),
        SIGUSR1 => Some(SignalMessage::SettingsChanged),
        SIGUSR2 => Some(SignalMessage::Check),
        _ => None,
    }
}

/// Channel endpoints plus the signal thread's handle.
///
/// Dropping the state closes the signal iterator, which ends the thread.
pub struct SignalState {
    pub signal_receiver: Receiver<SignalMessage>,
    pub signal_sender: Sender<SignalMessage>,
    shutdown: Arc<AtomicBool>,
    handle: Handle,
}

impl SignalState {
    /// Set as soon as a shutdown signal arrives, before the main loop sees
    /// the queued message. Open prompts watch it.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }
}

/// Forward one raw signal. Returns false once the main loop is gone.
fn forward_signal(
    signal: i32,
    sender: &Sender<SignalMessage>,
    shutdown: &AtomicBool,
    debug_enabled: bool,
) -> bool {
    let Some(message) = message_for_signal(signal) else {
        return true;
    };

    if debug_enabled {
        log_pipe!();
        log_debug!("Received signal {signal}: {message:?}");
    }

    if message == SignalMessage::Shutdown {
        shutdown.store(true, Ordering::SeqCst);
    }
    sender.send(message).is_ok()
}

impl Drop for SignalState {
    fn drop(&mut self) {
        self.handle.close();
    }
}

/// Register signal handlers and start the forwarding thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1, SIGUSR2])
        .context("failed to register signal handlers")?;
    let handle = signals.handle();

    let shutdown = Arc::new(AtomicBool::new(false));

    let sender = signal_sender.clone();
    let flag = Arc::clone(&shutdown);
    thread::spawn(move || {
        for signal in signals.forever() {
            if !forward_signal(signal, &sender, &flag, debug_enabled) {
                break;
            }
        }
    });

    Ok(SignalState {
        signal_receiver,
        signal_sender,
        shutdown,
        handle,
    })
}
