use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://my.gridpane.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HOURLY_LIMIT: u32 = 100;
pub const DEFAULT_LOCK_WAIT_MS: u64 = 5000;
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;
pub const DEFAULT_TOKEN_FILE: &str = "~/.gridpane";

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence)
    Cli,
    /// Value from a `GPCTL_*` environment variable
    Env,
    /// Value loaded from the configuration file
    Config,
    /// Built-in default value (lowest precedence)
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaConfig {
    pub hourly_limit: u32,
    pub lock_wait_ms: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            hourly_limit: DEFAULT_HOURLY_LIMIT,
            lock_wait_ms: DEFAULT_LOCK_WAIT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilesConfig {
    /// Token file path as written (may start with `~`)
    pub token_file: String,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            token_file: DEFAULT_TOKEN_FILE.to_string(),
        }
    }
}

/// Effective gpctl configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub quota: QuotaConfig,
    pub cache: CacheConfig,
    pub profiles: ProfilesConfig,
    /// Root of persisted state (quota records, caches, bindings)
    pub state_dir: PathBuf,
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            quota: QuotaConfig::default(),
            cache: CacheConfig::default(),
            profiles: ProfilesConfig::default(),
            state_dir: gpctl_utils::paths::gpctl_home(),
            config_file: None,
            source_attribution: HashMap::new(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.quota.lock_wait_ms)
    }

    #[must_use]
    pub fn token_file_path(&self) -> PathBuf {
        gpctl_utils::paths::expand_tilde(&self.profiles.token_file)
    }

    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Default)
    }
}

// ----------------------------------------------------------------------------
// File layout
// ----------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlConfig {
    pub api: Option<TomlApi>,
    pub quota: Option<TomlQuota>,
    pub cache: Option<TomlCache>,
    pub profiles: Option<TomlProfiles>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlApi {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlQuota {
    pub hourly_limit: Option<u32>,
    pub lock_wait_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlCache {
    pub max_age_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlProfiles {
    pub token_file: Option<String>,
}
