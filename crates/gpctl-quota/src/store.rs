use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gpctl_lock::{LockOptions, ScopedLock};
use gpctl_utils::atomic_write::write_json_atomic;
use gpctl_utils::error::QuotaError;
use tracing::trace;

use crate::state::QuotaState;

/// Persistence for quota records, one per account.
///
/// `transact` gives the closure exclusive access to the record for its whole
/// duration and persists whatever the closure leaves behind.
pub trait QuotaStore: Send + Sync {
    /// Read-modify-write the record for `account` atomically
    fn transact(
        &self,
        account: &str,
        apply: &mut dyn FnMut(&mut Option<QuotaState>),
    ) -> Result<(), QuotaError>;

    /// Read the record without locking
    fn load(&self, account: &str) -> Result<Option<QuotaState>, QuotaError>;
}

/// Quota records as `<dir>/<account>.json`, guarded by `<dir>/<account>.lock`
#[derive(Debug, Clone)]
pub struct FileQuotaStore {
    dir: PathBuf,
    lock_options: LockOptions,
}

impl FileQuotaStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, lock_options: LockOptions) -> Self {
        Self {
            dir: dir.into(),
            lock_options,
        }
    }

    #[must_use]
    pub fn record_path(&self, account: &str) -> PathBuf {
        self.dir.join(format!("{account}.json"))
    }

    fn read(path: &Path) -> Result<Option<QuotaState>, QuotaError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(QuotaError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| QuotaError::Corrupt {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

impl QuotaStore for FileQuotaStore {
    fn transact(
        &self,
        account: &str,
        apply: &mut dyn FnMut(&mut Option<QuotaState>),
    ) -> Result<(), QuotaError> {
        // Released on drop, including when persisting fails below
        let _lock = ScopedLock::acquire(&self.dir, account, self.lock_options)?;
        let path = self.record_path(account);

        let mut record = Self::read(&path)?;
        apply(&mut record);

        if let Some(state) = &record {
            write_json_atomic(&path, state).map_err(|source| QuotaError::Io {
                path: path.display().to_string(),
                source,
            })?;
            trace!(account, count = state.count, "Quota record persisted");
        }
        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<QuotaState>, QuotaError> {
        Self::read(&self.record_path(account))
    }
}

/// In-process store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    records: Mutex<HashMap<String, QuotaState>>,
}

impl MemoryQuotaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(account: &str, state: QuotaState) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(account.to_string(), state);
        store
    }
}

impl QuotaStore for MemoryQuotaStore {
    fn transact(
        &self,
        account: &str,
        apply: &mut dyn FnMut(&mut Option<QuotaState>),
    ) -> Result<(), QuotaError> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut record = records.get(account).copied();
        apply(&mut record);
        if let Some(state) = record {
            records.insert(account.to_string(), state);
        }
        Ok(())
    }

    fn load(&self, account: &str) -> Result<Option<QuotaState>, QuotaError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(account)
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpctl_lock::LockError;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store(dir: &Path) -> FileQuotaStore {
        FileQuotaStore::new(dir, LockOptions::default().with_wait(Duration::from_millis(100)))
    }

    #[test]
    fn test_transact_creates_and_updates_record() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());

        store
            .transact("main", &mut |slot| {
                assert!(slot.is_none());
                *slot = Some(QuotaState::new(7200, 10));
            })
            .unwrap();

        store
            .transact("main", &mut |slot| {
                let state = slot.as_mut().unwrap();
                state.count += 1;
            })
            .unwrap();

        let state = store.load("main").unwrap().unwrap();
        assert_eq!(state.count, 1);
        assert_eq!(state.window_start, 7200);
        assert!(ScopedLock::holder(temp.path(), "main").unwrap().is_none());
    }

    #[test]
    fn test_accounts_are_separate_files() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        store
            .transact("a", &mut |slot| *slot = Some(QuotaState::new(0, 1)))
            .unwrap();

        assert!(temp.path().join("a.json").exists());
        assert!(store.load("b").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.json"), "{not json").unwrap();
        let store = store(temp.path());

        let err = store.transact("main", &mut |_| {}).unwrap_err();
        assert!(matches!(err, QuotaError::Corrupt { .. }));
        assert!(ScopedLock::holder(temp.path(), "main").unwrap().is_none());
    }

    #[test]
    fn test_busy_lock_times_out() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        let _held =
            ScopedLock::acquire(temp.path(), "main", LockOptions::default()).unwrap();

        let err = store.transact("main", &mut |_| {}).unwrap_err();
        assert!(matches!(err, QuotaError::Lock(LockError::Timeout { .. })));
    }

    #[test]
    fn test_account_with_path_separator_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store(temp.path());
        let err = store.transact("../evil", &mut |_| {}).unwrap_err();
        assert!(matches!(err, QuotaError::Lock(LockError::InvalidKey { .. })));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryQuotaStore::new();
        store
            .transact("x", &mut |slot| *slot = Some(QuotaState::new(3600, 5)))
            .unwrap();
        assert_eq!(store.load("x").unwrap().unwrap().window_start, 3600);
    }
}
