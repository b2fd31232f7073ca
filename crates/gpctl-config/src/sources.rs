use std::collections::BTreeMap;

use crate::Config;

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut out = BTreeMap::new();
        let mut add = |key: &str, value: String| {
            out.insert(key.to_string(), (value, self.source_of(key).to_string()));
        };

        add("api.base_url", self.api.base_url.clone());
        add("api.timeout_secs", self.api.timeout_secs.to_string());
        add("quota.hourly_limit", self.quota.hourly_limit.to_string());
        add("quota.lock_wait_ms", self.quota.lock_wait_ms.to_string());
        add("cache.max_age_secs", self.cache.max_age_secs.to_string());
        add("profiles.token_file", self.profiles.token_file.clone());
        add("state_dir", self.state_dir.display().to_string());

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, ConfigSource};

    #[test]
    fn test_effective_config_lists_every_key_with_source() {
        let mut config = Config::default();
        config.quota.hourly_limit = 7;
        config
            .source_attribution
            .insert("quota.hourly_limit".to_string(), ConfigSource::Cli);

        let effective = config.effective_config();
        assert_eq!(effective.len(), 7);
        assert_eq!(
            effective["quota.hourly_limit"],
            ("7".to_string(), "cli".to_string())
        );
        assert_eq!(effective["api.base_url"].1, "default");
    }
}
