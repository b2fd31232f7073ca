//! Per-invocation context shared by command handlers
//!
//! A [`Session`] owns the effective configuration and the injected prompter
//! and clock, and builds the stores, trackers and clients commands need. No
//! state outlives the invocation except what the stores persist.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use gpctl_api::{GridPaneClient, HttpTransport, QuotaGuarded, ResourceKind};
use gpctl_cache::{CachePopulator, CacheType, FreshnessGate};
use gpctl_config::Config;
use gpctl_lock::LockOptions;
use gpctl_profiles::{CredentialProfile, FileBindingStore, FileTokenStore, ProfileSelector};
use gpctl_quota::{FileQuotaStore, QuotaTracker};
use gpctl_utils::GpError;
use gpctl_utils::atomic_write::write_json_atomic;
use gpctl_utils::error::CacheError;
use gpctl_utils::paths::StatePaths;
use gpctl_utils::prompt::Prompter;
use gpctl_utils::time::Clock;
use tracing::debug;

pub struct Session {
    config: Config,
    paths: StatePaths,
    prompter: Box<dyn Prompter>,
    clock: Arc<dyn Clock>,
    profile_override: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(
        config: Config,
        prompter: Box<dyn Prompter>,
        clock: Arc<dyn Clock>,
        profile_override: Option<String>,
    ) -> Self {
        let paths = StatePaths::new(&config.state_dir);
        Self {
            config,
            paths,
            prompter,
            clock,
            profile_override,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    fn lock_options(&self) -> LockOptions {
        LockOptions::default().with_wait(self.config.lock_wait())
    }

    #[must_use]
    pub fn selector(&self) -> ProfileSelector {
        ProfileSelector::new(
            Arc::new(FileTokenStore::new(self.config.token_file_path())),
            Arc::new(FileBindingStore::new(self.paths.bindings_file())),
        )
    }

    /// The `--profile` override when given, otherwise affinity-based selection
    pub fn select_profile(&self, domain: Option<&str>) -> Result<CredentialProfile, GpError> {
        let selector = self.selector();
        match &self.profile_override {
            Some(name) => {
                debug!(profile = %name, "Using profile from --profile");
                Ok(selector.select_named(name)?)
            }
            None => selector.select(domain, self.prompter()),
        }
    }

    #[must_use]
    pub fn tracker(&self, profile: &CredentialProfile) -> QuotaTracker {
        QuotaTracker::new(
            Arc::new(FileQuotaStore::new(self.paths.quota_dir(), self.lock_options())),
            Arc::clone(&self.clock),
            profile.name.clone(),
            self.config.quota.hourly_limit,
        )
    }

    /// Quota-charged client authenticated as `profile`
    pub fn client(&self, profile: &CredentialProfile) -> Result<GridPaneClient, GpError> {
        let transport = HttpTransport::new(
            self.config.api.base_url.clone(),
            profile.token.clone(),
            self.config.request_timeout(),
        )?;
        Ok(GridPaneClient::new(Arc::new(QuotaGuarded::new(
            transport,
            self.tracker(profile),
        ))))
    }

    #[must_use]
    pub fn gate(&self) -> FreshnessGate {
        FreshnessGate::new(
            self.paths.cache_dir(),
            self.config.cache.max_age_secs,
            self.lock_options(),
        )
    }
}

/// Fills caches from the API.
///
/// Without a preselected profile one is chosen in `prepare`, which the gate
/// calls only when population will happen and before it takes the cache
/// lock. Reusing a fresh cache never prompts for credentials.
pub struct ApiCachePopulator<'a> {
    session: &'a Session,
    profile: Option<CredentialProfile>,
    selected: OnceLock<CredentialProfile>,
}

impl<'a> ApiCachePopulator<'a> {
    #[must_use]
    pub fn new(session: &'a Session, profile: Option<CredentialProfile>) -> Self {
        Self {
            session,
            profile,
            selected: OnceLock::new(),
        }
    }

    fn profile(&self) -> Result<CredentialProfile, GpError> {
        if let Some(profile) = self.profile.as_ref().or_else(|| self.selected.get()) {
            return Ok(profile.clone());
        }
        let profile = self.session.select_profile(None)?;
        Ok(self.selected.get_or_init(|| profile).clone())
    }
}

#[must_use]
pub const fn resource_kind(cache_type: CacheType) -> ResourceKind {
    match cache_type {
        CacheType::Sites => ResourceKind::Sites,
        CacheType::Servers => ResourceKind::Servers,
    }
}

#[async_trait]
impl CachePopulator for ApiCachePopulator<'_> {
    async fn prepare(&self, _cache_type: CacheType) -> Result<(), GpError> {
        self.profile().map(|_| ())
    }

    async fn populate(&self, cache_type: CacheType, target: &Path) -> Result<(), GpError> {
        let profile = self.profile()?;
        let client = self.session.client(&profile)?;
        let summaries = client.list(resource_kind(cache_type)).await?;

        write_json_atomic(target, &summaries).map_err(|source| CacheError::Io {
            path: target.display().to_string(),
            source,
        })?;
        debug!(
            cache_type = %cache_type,
            count = summaries.len(),
            profile = %profile.name,
            "Cache written"
        );
        Ok(())
    }
}
