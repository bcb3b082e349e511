//! Lock file management for single-instance enforcement.
//!
//! The daemon holds an exclusive `fs2` lock on
//! `$XDG_RUNTIME_DIR/themeshift.lock` for its whole lifetime. The file
//! records the daemon's PID and custom config directory so that one-shot
//! commands can find and signal it.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::instance::InstanceInfo;
use crate::constants::LOCK_FILE_NAME;

/// Path of the daemon's lock file.
pub fn get_main_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join(LOCK_FILE_NAME)
}

/// Result of trying to become the running daemon.
#[derive(Debug)]
pub enum LockOutcome {
    Acquired(LockFile),
    /// Another process holds the lock. The PID is `None` if the lock file
    /// could not be read.
    Held { pid: Option<u32> },
}

/// An acquired lock. The lock is released and the file removed on drop.
#[derive(Debug)]
pub struct LockFile {
    file: File,
    path: PathBuf,
}

impl LockFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to open lock file {}", path.display()))
}

/// Try to take the daemon lock at `path`.
pub fn acquire_lock_at(path: &Path, info: &InstanceInfo) -> Result<LockOutcome> {
    let mut file = open_lock_file(path)?;

    if file.try_lock_exclusive().is_err() {
        let pid = std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| InstanceInfo::from_lock_contents(&contents).ok())
            .map(|info| info.pid);
        return Ok(LockOutcome::Held { pid });
    }

    file.set_len(0).context("Failed to truncate lock file")?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(info.to_lock_contents().as_bytes())
        .context("Failed to write lock file")?;
    file.flush()?;

    Ok(LockOutcome::Acquired(LockFile {
        file,
        path: path.to_path_buf(),
    }))
}

/// Try to take the daemon lock for this process.
pub fn acquire_lock() -> Result<LockOutcome> {
    acquire_lock_at(&get_main_lock_path(), &InstanceInfo::current())
}

/// True if some process currently holds the lock at `path`.
pub fn is_lock_held(path: &Path) -> bool {
    let Ok(file) = OpenOptions::new().read(true).write(true).open(path) else {
        return false;
    };
    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            false
        }
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn info(pid: u32) -> InstanceInfo {
        InstanceInfo {
            pid,
            config_dir: None,
        }
    }

    #[test]
    fn test_lock_is_exclusive_and_removed_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("themeshift.lock");

        let LockOutcome::Acquired(lock) = acquire_lock_at(&path, &info(4242)).unwrap() else {
            panic!("first lock should succeed");
        };
        assert!(is_lock_held(&path));

        match acquire_lock_at(&path, &info(1)).unwrap() {
            LockOutcome::Held { pid } => assert_eq!(pid, Some(4242)),
            LockOutcome::Acquired(_) => panic!("second lock should fail"),
        }

        drop(lock);
        assert!(!path.exists());
        assert!(!is_lock_held(&path));
    }

    #[test]
    fn test_leftover_unlocked_file_is_reused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("themeshift.lock");
        std::fs::write(&path, "999999\n\n").unwrap();

        let outcome = acquire_lock_at(&path, &info(7)).unwrap();
        assert!(matches!(outcome, LockOutcome::Acquired(_)));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("7\n"));
    }
}
