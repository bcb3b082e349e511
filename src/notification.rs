//! User notifications.
//!
//! Notifications are fire-and-forget: a notifier never reports failure to the
//! caller. [`DesktopNotifier`] logs the message and forwards it to
//! `notify-send`; [`LogNotifier`] only logs.

use std::process::{Command, Stdio};

use crate::constants::NOTIFY_SEND_BINARY;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Error,
}

/// Delivers short messages to the user.
pub trait Notifier {
    fn notify(&self, message: &str, level: NotifyLevel);
}

fn log_notification(message: &str, level: NotifyLevel) {
    log_pipe!();
    match level {
        NotifyLevel::Info => log_info!("{message}"),
        NotifyLevel::Error => log_error!("{message}"),
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        log_notification(message, level);
    }
}

/// Logs and sends desktop notifications through `notify-send`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    fn urgency(level: NotifyLevel) -> &'static str {
        match level {
            NotifyLevel::Info => "normal",
            NotifyLevel::Error => "critical",
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        log_notification(message, level);

        // Missing notify-send or no notification daemon is not an error.
        let _ = Command::new(NOTIFY_SEND_BINARY)
            .args(["--app-name", "themeshift", "--urgency", Self::urgency(level)])
            .arg("themeshift")
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .and_then(|mut child| child.wait());
    }
}

/// Build the notifier selected by `desktop_notifications`.
pub fn create_notifier(desktop_notifications: bool) -> Box<dyn Notifier> {
    if desktop_notifications {
        Box::new(DesktopNotifier)
    } else {
        Box::new(LogNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_critical() {
        assert_eq!(DesktopNotifier::urgency(NotifyLevel::Error), "critical");
        assert_eq!(DesktopNotifier::urgency(NotifyLevel::Info), "normal");
    }
}
