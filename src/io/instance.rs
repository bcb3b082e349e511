//! Running-daemon discovery and signalling.
//!
//! One-shot commands use this to find the daemon through its lock file and
//! to poke it with Unix signals: SIGUSR2 asks for an immediate check, SIGUSR1
//! for a settings reload.

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::path::PathBuf;

use super::lock;

/// Information about a running themeshift daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    pub pid: u32,
    /// Custom config directory if the daemon was started with `--config`
    pub config_dir: Option<PathBuf>,
}

impl InstanceInfo {
    /// Info describing the current process.
    pub fn current() -> Self {
        Self {
            pid: std::process::id(),
            config_dir: crate::config::get_custom_config_dir(),
        }
    }

    /// Parse lock file contents: PID on line 1, config dir on line 2
    /// (empty or missing for the default directory).
    pub fn from_lock_contents(contents: &str) -> Result<Self> {
        let mut lines = contents.lines();
        let pid = lines
            .next()
            .context("Lock file is empty")?
            .trim()
            .parse::<u32>()
            .context("Invalid PID format in lock file")?;
        let config_dir = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from);

        Ok(Self { pid, config_dir })
    }

    pub fn to_lock_contents(&self) -> String {
        let config_dir = self
            .config_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        format!("{}\n{}\n", self.pid, config_dir)
    }
}

/// Find the running daemon, if any.
///
/// The lock must actually be held; a leftover file from a crashed daemon
/// does not count.
pub fn get_running_instance() -> Result<Option<InstanceInfo>> {
    let lock_path = lock::get_main_lock_path();

    let contents = match std::fs::read_to_string(&lock_path) {
        Ok(contents) => contents,
        Err(_) => return Ok(None),
    };

    if !lock::is_lock_held(&lock_path) {
        return Ok(None);
    }

    let info = InstanceInfo::from_lock_contents(&contents)?;
    if info.pid == std::process::id() || !is_instance_running(info.pid) {
        return Ok(None);
    }
    Ok(Some(info))
}

/// Use the daemon's config directory unless one was given on the command line.
pub fn adopt_config_dir(info: &InstanceInfo) {
    if crate::config::get_custom_config_dir().is_none()
        && let Some(ref dir) = info.config_dir
    {
        let _ = crate::config::set_config_dir(Some(dir.display().to_string()));
    }
}

/// Check if a process with the given PID is still running.
pub fn is_instance_running(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{pid}")).exists()
}

fn send_signal(pid: u32, signal: Signal) -> Result<()> {
    kill(Pid::from_raw(pid as i32), signal)
        .with_context(|| format!("Failed to send {} to process {pid}", signal.as_str()))
}

/// Ask the daemon to re-evaluate the schedule now (SIGUSR2).
pub fn send_check_signal(pid: u32) -> Result<()> {
    send_signal(pid, Signal::SIGUSR2)
}

/// Ask the daemon to reload its settings (SIGUSR1).
pub fn send_reload_signal(pid: u32) -> Result<()> {
    send_signal(pid, Signal::SIGUSR1)
}
