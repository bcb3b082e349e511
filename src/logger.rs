//! Structured logging with box-drawing output.
//!
//! Every message is a single line (or a spacer plus a line) drawn against a
//! vertical pipe so that a daemon session reads as one continuous block:
//!
//! ```text
//! ┏ themeshift v0.3.0 ━━╸
//! ┃
//! ┣ Loaded configuration
//! ┃   Backend: GTK
//! ┃
//! ┣ Switched to light profile 'Adwaita'
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a new conceptual block (adds a spacer pipe first).
//! - `log_decorated!` continues the current block.
//! - `log_indented!` lists details that belong to the line above it.
//! - `log_pipe!` inserts an empty spacer, normally right before a
//!   `log_info!`/`log_warning!`/`log_error!`/`log_debug!` that starts a block.
//! - `log_version!` and `log_end!` frame the whole session.
//! - `log_error_exit!` terminates the flow with a corner glyph.
//!
//! Output can be switched off globally (`Log::set_enabled(false)`), which the
//! `get --json` command uses to keep machine-readable output clean.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// The visual shape of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Decorated,
    Indented,
    Pipe,
    BlockStart,
    Version,
    End,
    Info,
    Warning,
    Error,
    ErrorExit,
    Debug,
}

/// Global switch for log output.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if log output is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Render a message in the given shape, including the trailing newline.
    pub fn format_line(line: Line, message: &str) -> String {
        match line {
            Line::Decorated => format!("┣ {message}\n"),
            Line::Indented => format!("┃   {message}\n"),
            Line::Pipe => "┃\n".to_string(),
            Line::BlockStart => format!("┃\n┣ {message}\n"),
            Line::Version => format!(
                "┏ {} v{} ━━╸\n",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            Line::End => "╹\n".to_string(),
            Line::Info => format!("┣[\x1b[32mINFO\x1b[0m] {message}\n"),
            Line::Warning => format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"),
            Line::Error => format!("┣[\x1b[31mERROR\x1b[0m] {message}\n"),
            Line::ErrorExit => format!("┃\n┗[\x1b[31mERROR\x1b[0m] {message}\n"),
            Line::Debug => format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"),
        }
    }
}

/// Write a line to stdout if logging is enabled. Used by the macros.
pub fn emit(line: Line, message: &str) {
    if !Log::is_enabled() {
        return;
    }
    let text = Log::format_line(line, message);
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

// # Logging Macros

/// Log a message that continues the current block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Decorated, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Decorated, &format!("{}", $expr))
    };
}

/// Log a detail line indented under its parent.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Indented, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Indented, &format!("{}", $expr))
    };
}

/// Log an empty spacer pipe.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit($crate::logger::Line::Pipe, "")
    };
}

/// Log the first line of a new block.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::BlockStart, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::BlockStart, &format!("{}", $expr))
    };
}

/// Log the session header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit($crate::logger::Line::Version, "")
    };
}

/// Log the session terminator.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit($crate::logger::Line::End, "")
    };
}

/// Log an informational message.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Info, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Info, &format!("{}", $expr))
    };
}

/// Log a warning.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Warning, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Warning, &format!("{}", $expr))
    };
}

/// Log an error.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Error, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Error, &format!("{}", $expr))
    };
}

/// Log an error that terminates the current flow.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::ErrorExit, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::ErrorExit, &format!("{}", $expr))
    };
}

/// Log a debug message.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($crate::logger::Line::Debug, &format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::logger::emit($crate::logger::Line::Debug, &format!("{}", $expr))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_block_start_adds_spacer() {
        assert_eq!(Log::format_line(Line::BlockStart, "hi"), "┃\n┣ hi\n");
    }

    #[test]
    fn test_indented_line() {
        assert_eq!(Log::format_line(Line::Indented, "x = 1"), "┃   x = 1\n");
    }

    #[test]
    fn test_version_header_names_package() {
        let header = Log::format_line(Line::Version, "");
        assert!(header.starts_with("┏ themeshift v"));
    }

    #[test]
    #[serial]
    fn test_logging_can_be_disabled() {
        Log::set_enabled(false);
        assert!(!Log::is_enabled());
        log_info!("suppressed {}", 1);
        Log::set_enabled(true);
        assert!(Log::is_enabled());
    }
}
