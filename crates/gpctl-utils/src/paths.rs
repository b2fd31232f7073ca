use std::cell::RefCell;
use std::path::{Path, PathBuf};

// Thread-local override used only in tests to avoid process-global env races.
thread_local! {
    static THREAD_HOME: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

/// Environment variable that relocates all persisted gpctl state
pub const HOME_ENV: &str = "GPCTL_HOME";

/// Resolve the gpctl state directory:
/// 1) thread-local override (tests use this)
/// 2) env `GPCTL_HOME`
/// 3) `<platform local data dir>/gpctl`
/// 4) `.gpctl-state` in the working directory
#[must_use]
pub fn gpctl_home() -> PathBuf {
    if let Some(tl) = THREAD_HOME.with(|tl| tl.borrow().clone()) {
        return tl;
    }
    if let Some(p) = std::env::var_os(HOME_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    dirs::data_local_dir()
        .map(|d| d.join("gpctl"))
        .unwrap_or_else(|| PathBuf::from(".gpctl-state"))
}

/// Concrete locations of every persisted record below a state directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<home>/quota`, holding `<account>.json` and `<account>.lock`
    #[must_use]
    pub fn quota_dir(&self) -> PathBuf {
        self.root.join("quota")
    }

    /// `<home>/cache`, holding `sites.json`, `servers.json` and their locks
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    #[must_use]
    pub fn bindings_file(&self) -> PathBuf {
        self.root.join("domain-profiles.json")
    }
}

impl Default for StatePaths {
    fn default() -> Self {
        Self::new(gpctl_home())
    }
}

/// Expand a leading `~` or `~/` to the user's home directory
#[must_use]
pub fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// RAII guard for isolated home that clears thread-local state on drop
#[cfg(any(test, feature = "test-utils"))]
pub struct HomeGuard {
    inner: tempfile::TempDir,
}

#[cfg(any(test, feature = "test-utils"))]
impl Drop for HomeGuard {
    fn drop(&mut self) {
        THREAD_HOME.with(|tl| *tl.borrow_mut() = None);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl std::ops::Deref for HomeGuard {
    type Target = tempfile::TempDir;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Test helper: give this thread a unique state home under the system temp dir.
///
/// Hold the `HomeGuard` for the test's duration so the directory stays alive.
#[cfg(any(test, feature = "test-utils"))]
#[must_use]
pub fn with_isolated_home() -> HomeGuard {
    let td = tempfile::TempDir::new().expect("create temp home");
    let p = td.path().to_path_buf();
    THREAD_HOME.with(|tl| *tl.borrow_mut() = Some(p));
    HomeGuard { inner: td }
}
