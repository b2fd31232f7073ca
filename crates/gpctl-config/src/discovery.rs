use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gpctl_utils::error::ConfigError;
use tracing::debug;

use crate::model::TomlConfig;
use crate::{CliArgs, Config, ConfigSource};

pub const ENV_HOME: &str = "GPCTL_HOME";
pub const ENV_BASE_URL: &str = "GPCTL_API_BASE_URL";
pub const ENV_HOURLY_LIMIT: &str = "GPCTL_HOURLY_LIMIT";
pub const ENV_TOKEN_FILE: &str = "GPCTL_TOKEN_FILE";

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for the upward file search and the
    /// platform config directory as the last fallback.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: ".".to_string(),
            source,
        })?;
        let user_config = dirs::config_dir().map(|d| d.join("gpctl").join("config.toml"));
        Self::discover_from(&start_dir, cli_args, user_config.as_deref(), &|key| {
            std::env::var(key).ok()
        })
    }

    /// Path-driven variant used by tests to avoid process-global state.
    ///
    /// `env` looks up `GPCTL_*` variables; `user_config` is the fallback file
    /// used when the upward search finds nothing.
    pub fn discover_from(
        start_dir: &Path,
        cli_args: &CliArgs,
        user_config: Option<&Path>,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config {
            source_attribution: HashMap::new(),
            ..Config::default()
        };

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir)
                .or_else(|| user_config.filter(|p| p.is_file()).map(Path::to_path_buf)),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file = Self::load_config_file(path)?;
            config.apply_file(file);
            config.config_file = Some(path.clone());
        }

        config.apply_env(env)?;
        config.apply_cli(cli_args);
        config.validate()?;

        Ok(config)
    }

    /// Search upward from `start_dir` for `.gpctl/config.toml`, stopping at a
    /// repository root marker or the filesystem root
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(".gpctl").join("config.toml");
            if config_path.is_file() {
                return Some(config_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
            // Raced with a delete; behave as if no file was found
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let src = ConfigSource::Config;

        if let Some(api) = file.api {
            if let Some(v) = api.base_url {
                self.api.base_url = v;
                self.mark("api.base_url", src.clone());
            }
            if let Some(v) = api.timeout_secs {
                self.api.timeout_secs = v;
                self.mark("api.timeout_secs", src.clone());
            }
        }
        if let Some(quota) = file.quota {
            if let Some(v) = quota.hourly_limit {
                self.quota.hourly_limit = v;
                self.mark("quota.hourly_limit", src.clone());
            }
            if let Some(v) = quota.lock_wait_ms {
                self.quota.lock_wait_ms = v;
                self.mark("quota.lock_wait_ms", src.clone());
            }
        }
        if let Some(cache) = file.cache {
            if let Some(v) = cache.max_age_secs {
                self.cache.max_age_secs = v;
                self.mark("cache.max_age_secs", src.clone());
            }
        }
        if let Some(profiles) = file.profiles {
            if let Some(v) = profiles.token_file {
                self.profiles.token_file = v;
                self.mark("profiles.token_file", src);
            }
        }
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(home) = lookup(ENV_HOME) {
            self.state_dir = PathBuf::from(home);
            self.mark("state_dir", ConfigSource::Env);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.api.base_url = url;
            self.mark("api.base_url", ConfigSource::Env);
        }
        if let Some(raw) = lookup(ENV_HOURLY_LIMIT) {
            self.quota.hourly_limit =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "quota.hourly_limit".to_string(),
                        value: raw.clone(),
                        reason: format!("{ENV_HOURLY_LIMIT} must be a whole number"),
                    })?;
            self.mark("quota.hourly_limit", ConfigSource::Env);
        }
        if let Some(path) = lookup(ENV_TOKEN_FILE) {
            self.profiles.token_file = path;
            self.mark("profiles.token_file", ConfigSource::Env);
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        if let Some(url) = &cli_args.base_url {
            self.api.base_url = url.clone();
            self.mark("api.base_url", ConfigSource::Cli);
        }
        if let Some(limit) = cli_args.hourly_limit {
            self.quota.hourly_limit = limit;
            self.mark("quota.hourly_limit", ConfigSource::Cli);
        }
    }

    fn mark(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }
}
