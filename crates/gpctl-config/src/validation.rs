use gpctl_utils::error::ConfigError;

use crate::Config;

impl Config {
    /// Check value ranges after all sources are merged
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://"))
            || url.trim_start_matches("https://").trim_start_matches("http://").is_empty()
        {
            return Err(invalid(
                "api.base_url",
                &self.api.base_url,
                "must be an http:// or https:// URL",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs", "0", "must be at least 1"));
        }
        if self.quota.hourly_limit == 0 {
            return Err(invalid("quota.hourly_limit", "0", "must be at least 1"));
        }
        if self.cache.max_age_secs == 0 {
            return Err(invalid("cache.max_age_secs", "0", "must be at least 1"));
        }
        if self.profiles.token_file.trim().is_empty() {
            return Err(invalid("profiles.token_file", "", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(err: ConfigError) -> String {
        match err {
            ConfigError::InvalidValue { key, .. } => key,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "ftp://my.gridpane.com".to_string();
        assert_eq!(key_of(config.validate().unwrap_err()), "api.base_url");

        config.api.base_url = "https://".to_string();
        assert_eq!(key_of(config.validate().unwrap_err()), "api.base_url");

        config.api.base_url = "http://127.0.0.1:8080".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_values() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert_eq!(key_of(config.validate().unwrap_err()), "api.timeout_secs");

        let mut config = Config::default();
        config.quota.hourly_limit = 0;
        assert_eq!(key_of(config.validate().unwrap_err()), "quota.hourly_limit");

        let mut config = Config::default();
        config.cache.max_age_secs = 0;
        assert_eq!(key_of(config.validate().unwrap_err()), "cache.max_age_secs");
    }
}
