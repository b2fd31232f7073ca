use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use gpctl_lock::{LockOptions, ScopedLock, format_age};
use gpctl_utils::GpError;
use gpctl_utils::error::CacheError;
use gpctl_utils::prompt::Prompter;
use serde::Serialize;
use tracing::{debug, info};

use crate::artifact::{CacheArtifact, Freshness};
use crate::cache_type::CacheType;

/// What to do with a cache before a command reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheAction {
    /// Create a missing cache
    Populate,
    /// Use the cache as it is
    Reuse,
    /// Rebuild an existing cache
    Refresh,
}

impl std::fmt::Display for CacheAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Populate => write!(f, "populate"),
            Self::Reuse => write!(f, "reuse"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Fills a cache file.
///
/// Implementations write `target` atomically and report success only once
/// the content is in place.
#[async_trait]
pub trait CachePopulator: Send + Sync {
    /// Runs once population is decided and before the cache lock is taken.
    /// Anything that may prompt belongs here rather than in `populate`.
    async fn prepare(&self, _cache_type: CacheType) -> Result<(), GpError> {
        Ok(())
    }

    async fn populate(&self, cache_type: CacheType, target: &Path) -> Result<(), GpError>;
}

/// Final state after [`FreshnessGate::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOutcome {
    pub action: CacheAction,
    pub artifact: CacheArtifact,
}

/// Age-based reuse/refresh/populate decisions for the caches in one directory
#[derive(Debug, Clone)]
pub struct FreshnessGate {
    dir: PathBuf,
    max_age_secs: u64,
    lock_options: LockOptions,
}

impl FreshnessGate {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, max_age_secs: u64, lock_options: LockOptions) -> Self {
        Self {
            dir: dir.into(),
            max_age_secs,
            lock_options,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }

    pub fn probe(&self, cache_type: CacheType) -> Result<CacheArtifact, CacheError> {
        CacheArtifact::probe(&self.dir, cache_type)
    }

    /// Decide what to do with `artifact` at time `now`.
    ///
    /// Declining to create a missing cache is `CacheRequired`. Declining to
    /// refresh a stale one means reuse.
    pub fn decide(
        &self,
        artifact: &CacheArtifact,
        now: i64,
        prompter: &dyn Prompter,
    ) -> Result<CacheAction, CacheError> {
        let cache_type = artifact.cache_type;
        let action = match artifact.freshness(now, self.max_age_secs) {
            Freshness::Missing => {
                if !prompter.is_interactive()
                    || prompter.confirm(
                        &format!("The {cache_type} cache does not exist yet. Fetch it now?"),
                        true,
                    )
                {
                    CacheAction::Populate
                } else {
                    return Err(CacheError::CacheRequired {
                        cache_type: cache_type.to_string(),
                        command: cache_type.populate_command(),
                    });
                }
            }
            Freshness::Fresh { .. } => CacheAction::Reuse,
            Freshness::Stale { age_secs } => {
                if !prompter.is_interactive()
                    || prompter.confirm(
                        &format!(
                            "The {cache_type} cache is {} old. Refresh it now?",
                            format_age(age_secs)
                        ),
                        true,
                    )
                {
                    CacheAction::Refresh
                } else {
                    CacheAction::Reuse
                }
            }
        };

        info!(
            cache_type = %cache_type,
            age_secs = artifact.age_secs(now),
            action = %action,
            "Cache decision"
        );
        Ok(action)
    }

    /// Probe, decide, and when needed populate `cache_type` under its lock.
    ///
    /// `force` skips the decision and always refreshes. The populator's
    /// `prepare` runs before the lock is taken. When another process
    /// refreshed the cache while we waited for the lock, its result is reused.
    pub async fn ensure(
        &self,
        cache_type: CacheType,
        populator: &dyn CachePopulator,
        prompter: &dyn Prompter,
        now: i64,
        force: bool,
    ) -> Result<CacheOutcome, GpError> {
        let artifact = self.probe(cache_type)?;
        let seen = file_stamp(&artifact.path);
        let action = if force {
            CacheAction::Refresh
        } else {
            self.decide(&artifact, now, prompter)?
        };

        if action == CacheAction::Reuse {
            return Ok(CacheOutcome { action, artifact });
        }

        populator.prepare(cache_type).await?;

        let _lock = ScopedLock::acquire(&self.dir, &cache_type.lock_key(), self.lock_options)
            .map_err(CacheError::from)?;

        let current = self.probe(cache_type)?;
        let replaced = file_stamp(&current.path) != seen;
        if !force
            && replaced
            && matches!(current.freshness(now, self.max_age_secs), Freshness::Fresh { .. })
        {
            debug!(cache_type = %cache_type, "Cache refreshed by another process");
            return Ok(CacheOutcome {
                action: CacheAction::Reuse,
                artifact: current,
            });
        }

        let before = file_stamp(&current.path);
        populator.populate(cache_type, &artifact.path).await?;

        let populated = self.probe(cache_type)?;
        if !populated.exists() || file_stamp(&populated.path) == before {
            return Err(CacheError::CachePopulationInconsistent {
                cache_type: cache_type.to_string(),
                path: populated.path.display().to_string(),
            }
            .into());
        }

        info!(cache_type = %cache_type, action = %action, "Cache updated");
        Ok(CacheOutcome {
            action,
            artifact: populated,
        })
    }
}

/// Modification time and length, used to tell whether a file was rewritten
fn file_stamp(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = fs::metadata(path).ok()?;
    Some((meta.modified().ok()?, meta.len()))
}
