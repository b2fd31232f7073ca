use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use gpctl_utils::error::CacheError;

use crate::cache_type::CacheType;

/// A cache file as found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheArtifact {
    pub cache_type: CacheType,
    pub path: PathBuf,
    /// Modification time in epoch seconds; `None` when missing or empty
    pub last_modified: Option<i64>,
}

/// Age classification relative to a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Fresh { age_secs: u64 },
    Stale { age_secs: u64 },
}

impl CacheArtifact {
    /// Look at `<dir>/<file_name>`. A zero-length file counts as missing.
    pub fn probe(dir: &Path, cache_type: CacheType) -> Result<Self, CacheError> {
        let path = dir.join(cache_type.file_name());
        let last_modified = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {
                let modified = meta.modified().map_err(|source| CacheError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                let secs = match modified.duration_since(UNIX_EPOCH) {
                    Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
                    Err(before_epoch) => {
                        -i64::try_from(before_epoch.duration().as_secs()).unwrap_or(i64::MAX)
                    }
                };
                Some(secs)
            }
            Ok(_) => None,
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        Ok(Self {
            cache_type,
            path,
            last_modified,
        })
    }

    #[must_use]
    pub const fn exists(&self) -> bool {
        self.last_modified.is_some()
    }

    /// Seconds since last modification; a timestamp in the future counts as 0
    #[must_use]
    pub fn age_secs(&self, now: i64) -> Option<u64> {
        self.last_modified
            .map(|modified| u64::try_from(now.saturating_sub(modified)).unwrap_or(0))
    }

    /// Stale once the age reaches `max_age_secs`
    #[must_use]
    pub fn freshness(&self, now: i64, max_age_secs: u64) -> Freshness {
        match self.age_secs(now) {
            None => Freshness::Missing,
            Some(age_secs) if age_secs >= max_age_secs => Freshness::Stale { age_secs },
            Some(age_secs) => Freshness::Fresh { age_secs },
        }
    }

    /// Deserialize the cached JSON
    pub fn read_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, CacheError> {
        let text = fs::read_to_string(&self.path).map_err(|source| CacheError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| CacheError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
