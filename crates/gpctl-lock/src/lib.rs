//! Scoped cross-process locks for gpctl state records
//!
//! Each shared record (the quota counter for an account, a cache artifact)
//! is guarded by a `<key>.lock` file next to it. Exclusion comes from an OS
//! file lock (`flock` on Unix, `LockFileEx` on Windows) taken through
//! `fd-lock`. The kernel drops that lock when the holder's descriptor closes,
//! including when the process dies, so no lock is ever reclaimed by age.
//!
//! Lock files are created once and never removed: deleting a path another
//! process may already have opened would let two holders lock different
//! inodes. The file content is the holder's [`LockInfo`] while held and empty
//! after a clean release; it is informational only.
//!
//! A [`ScopedLock`] is released when it is dropped, so every exit path of the
//! guarded read-modify-write (including persist failures) gives the lock up.

use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Default time to wait for a busy lock before giving up
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Upper bound for a single backoff sleep while waiting
const MAX_BACKOFF_MS: u64 = 100;

/// Information written into the lock file by its holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID that holds the lock
    pub pid: u32,
    /// Seconds since UNIX epoch when the lock was taken
    pub created_at: u64,
    /// Resource key the lock guards
    pub key: String,
    /// gpctl version of the holder
    pub version: String,
}

impl LockInfo {
    fn current(key: &str) -> Self {
        Self {
            pid: process::id(),
            created_at: now_secs(),
            key: key.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// `PID 123, taken 5m ago`
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "PID {}, taken {} ago",
            self.pid,
            format_age(now_secs().saturating_sub(self.created_at))
        )
    }
}

fn describe_holder(holder: &Option<LockInfo>) -> String {
    holder
        .as_ref()
        .map_or_else(|| "holder unknown".to_string(), LockInfo::describe)
}

/// Lock errors for scoped lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error(
        "Timed out after {waited_ms}ms waiting for lock '{key}' ({})",
        describe_holder(.holder)
    )]
    Timeout {
        key: String,
        /// Holder recorded in the lock file, when it could be read
        holder: Option<LockInfo>,
        waited_ms: u64,
    },

    #[error("Invalid lock key '{key}': only ASCII alphanumerics, '.', '_' and '-' are allowed")]
    InvalidKey { key: String },

    #[error("Failed to acquire lock '{key}': {reason}")]
    AcquisitionFailed { key: String, reason: String },

    #[error("Failed to release lock '{key}': {reason}")]
    ReleaseFailed { key: String, reason: String },

    #[error("IO error during lock operation: {0}")]
    Io(#[from] io::Error),
}

/// How long to wait for a busy lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    pub wait: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            wait: DEFAULT_LOCK_WAIT,
        }
    }
}

impl LockOptions {
    #[must_use]
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

/// Exclusive lock on a single named resource, released on drop
pub struct ScopedLock {
    lock_path: PathBuf,
    /// Locked descriptor; closing it releases the OS lock
    fd_lock: Option<RwLock<fs::File>>,
    info: LockInfo,
}

impl ScopedLock {
    /// Acquire the lock for `key` inside `dir`, waiting up to `options.wait`.
    ///
    /// The lock file is `<dir>/<key>.lock`. The directory and file are created
    /// if needed.
    pub fn acquire(dir: &Path, key: &str, options: LockOptions) -> Result<Self, LockError> {
        validate_key(key)?;

        fs::create_dir_all(dir).map_err(|e| LockError::AcquisitionFailed {
            key: key.to_string(),
            reason: format!("Failed to create lock directory {}: {e}", dir.display()),
        })?;

        let lock_path = Self::lock_path(dir, key);
        let mut fd_lock = RwLock::new(Self::open(&lock_path, key)?);
        let info = LockInfo::current(key);
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            let acquired = match fd_lock.try_write() {
                Ok(mut guard) => {
                    Self::record_holder(&mut guard, &info)?;
                    // Keep the OS lock until the descriptor is closed in Drop
                    std::mem::forget(guard);
                    true
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => false,
                Err(e) => {
                    return Err(LockError::AcquisitionFailed {
                        key: key.to_string(),
                        reason: format!("Failed to lock {}: {e}", lock_path.display()),
                    });
                }
            };

            if acquired {
                debug!(key, attempts = attempt + 1, "Lock acquired");
                return Ok(Self {
                    lock_path,
                    fd_lock: Some(fd_lock),
                    info,
                });
            }

            let waited = started.elapsed();
            if waited >= options.wait {
                return Err(LockError::Timeout {
                    key: key.to_string(),
                    holder: read_info(&lock_path),
                    waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                });
            }
            trace!(key, attempt, "Lock busy, waiting");
            thread::sleep(backoff(attempt));
            attempt = attempt.saturating_add(1);
        }
    }

    /// Holder of `key` in `dir` when the lock is held right now.
    ///
    /// Returns `None` when the lock is free. Holder info is best effort:
    /// Windows refuses reads of a locked range, so there a held lock may also
    /// report `None`.
    pub fn holder(dir: &Path, key: &str) -> Result<Option<LockInfo>, LockError> {
        validate_key(key)?;
        let lock_path = Self::lock_path(dir, key);
        let file = match fs::OpenOptions::new().read(true).write(true).open(&lock_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LockError::Io(e)),
        };

        let mut file_lock = RwLock::new(file);
        match file_lock.try_write() {
            // Nobody holds it; whatever the file says is left over
            Ok(_guard) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(read_info(&lock_path)),
            Err(e) => Err(LockError::Io(e)),
        }
    }

    /// Release the lock explicitly (also happens on drop)
    pub fn release(mut self) -> Result<(), LockError> {
        match self.unlock() {
            Ok(()) => Ok(()),
            Err(e) => Err(LockError::ReleaseFailed {
                key: self.info.key.clone(),
                reason: e.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.info.key
    }

    #[must_use]
    pub const fn info(&self) -> &LockInfo {
        &self.info
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }

    fn lock_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.lock"))
    }

    fn open(lock_path: &Path, key: &str) -> Result<fs::File, LockError> {
        fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(lock_path)
            .map_err(|e| LockError::AcquisitionFailed {
                key: key.to_string(),
                reason: format!("Failed to open lock file {}: {e}", lock_path.display()),
            })
    }

    /// Overwrite the file with our holder info while the OS lock is held
    fn record_holder(file: &mut fs::File, info: &LockInfo) -> Result<(), LockError> {
        let json = serde_json::to_string_pretty(info).map_err(|e| LockError::AcquisitionFailed {
            key: info.key.clone(),
            reason: format!("Failed to serialize lock info: {e}"),
        })?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Clear the holder info, then close the descriptor to drop the OS lock.
    ///
    /// The file is emptied while still locked so a waiter never reads our
    /// info after it has taken over.
    fn unlock(&mut self) -> io::Result<()> {
        let Some(fd_lock) = self.fd_lock.take() else {
            return Ok(());
        };
        let file = fd_lock.into_inner();
        let cleared = file.set_len(0);
        drop(file);
        trace!(key = %self.info.key, "Lock released");
        cleared
    }
}

impl std::fmt::Debug for ScopedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLock")
            .field("lock_path", &self.lock_path)
            .field("info", &self.info)
            .field("held", &self.fd_lock.is_some())
            .finish()
    }
}

impl Drop for ScopedLock {
    fn drop(&mut self) {
        let _ = self.unlock();
    }
}

/// Holder info from a lock file; `None` when empty, unreadable or garbled
fn read_info(lock_path: &Path) -> Option<LockInfo> {
    let content = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Format an age in seconds, always flooring: `42s`, `5m`, `3h`, `2d`
#[must_use]
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

fn validate_key(key: &str) -> Result<(), LockError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(LockError::InvalidKey {
            key: key.to_string(),
        })
    }
}

/// Exponential backoff with deterministic per-PID jitter, capped at 100ms
fn backoff(attempt: u32) -> Duration {
    let base_ms = 5u64.saturating_mul(2u64.saturating_pow(attempt.min(5)));
    let jitter_ms = (u64::from(attempt).wrapping_mul(3) + u64::from(process::id()) % 7) % 7;
    Duration::from_millis(base_ms.saturating_add(jitter_ms).min(MAX_BACKOFF_MS))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
