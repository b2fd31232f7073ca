use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use gpctl_utils::atomic_write::write_json_atomic;
use gpctl_utils::error::ProfileError;

/// Persistence for `sanitized domain → profile name`
///
/// At most one binding per domain; `set` overwrites.
pub trait BindingStore: Send + Sync {
    fn get(&self, domain: &str) -> Result<Option<String>, ProfileError>;
    fn set(&self, domain: &str, profile: &str) -> Result<(), ProfileError>;
    fn all(&self) -> Result<BTreeMap<String, String>, ProfileError>;
}

/// Bindings in a single sorted JSON object, replaced atomically on each write.
///
/// Writes are last-write-wins without a lock; a concurrent writer can drop
/// another process's new binding, which only costs a prompt next time.
#[derive(Debug, Clone)]
pub struct FileBindingStore {
    path: PathBuf,
}

impl FileBindingStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl BindingStore for FileBindingStore {
    fn get(&self, domain: &str) -> Result<Option<String>, ProfileError> {
        Ok(self.all()?.remove(domain))
    }

    fn set(&self, domain: &str, profile: &str) -> Result<(), ProfileError> {
        let mut map = self.all()?;
        map.insert(domain.to_string(), profile.to_string());
        write_json_atomic(&self.path, &map).map_err(|source| ProfileError::Io {
            path: self.describe(),
            source,
        })
    }

    fn all(&self) -> Result<BTreeMap<String, String>, ProfileError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(ProfileError::Io {
                    path: self.describe(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| ProfileError::BindingsCorrupt {
            path: self.describe(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryBindingStore {
    map: Mutex<BTreeMap<String, String>>,
}

impl MemoryBindingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BindingStore for MemoryBindingStore {
    fn get(&self, domain: &str) -> Result<Option<String>, ProfileError> {
        Ok(self.map().get(domain).cloned())
    }

    fn set(&self, domain: &str, profile: &str) -> Result<(), ProfileError> {
        self.map().insert(domain.to_string(), profile.to_string());
        Ok(())
    }

    fn all(&self) -> Result<BTreeMap<String, String>, ProfileError> {
        Ok(self.map().clone())
    }
}
