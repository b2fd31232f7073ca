use std::sync::Arc;

use gpctl_utils::error::QuotaError;
use gpctl_utils::time::Clock;
use tracing::{debug, warn};

use crate::state::{QuotaDecision, QuotaState};
use crate::store::QuotaStore;

/// Hourly budget for one account
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    clock: Arc<dyn Clock>,
    account: String,
    limit: u32,
}

impl std::fmt::Debug for QuotaTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaTracker")
            .field("account", &self.account)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl QuotaTracker {
    #[must_use]
    pub fn new(
        store: Arc<dyn QuotaStore>,
        clock: Arc<dyn Clock>,
        account: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            store,
            clock,
            account: account.into(),
            limit,
        }
    }

    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Charge one request against the current hour.
    ///
    /// A denial is a normal `Ok` result with `allowed == false`.
    pub fn check_and_increment(&self) -> Result<QuotaDecision, QuotaError> {
        let now = self.clock.now();
        let limit = self.limit;
        let mut decision = None;

        self.store.transact(&self.account, &mut |slot| {
            let state = slot.get_or_insert_with(|| QuotaState::new(now, limit));
            decision = Some(state.check_and_increment(limit, now));
        })?;

        let decision = decision.unwrap_or(QuotaDecision {
            allowed: false,
            used: 0,
            remaining: 0,
            limit,
            reset_at: now,
        });

        if decision.allowed {
            debug!(
                account = %self.account,
                used = decision.used,
                remaining = decision.remaining,
                reset_at = decision.reset_at,
                "Quota charged"
            );
        } else {
            warn!(
                account = %self.account,
                used = decision.used,
                limit,
                reset_at = decision.reset_at,
                "Hourly quota exhausted"
            );
        }
        Ok(decision)
    }

    /// Charge one request, turning a denial into `RateLimitExceeded`
    pub fn require_headroom(&self) -> Result<QuotaDecision, QuotaError> {
        let decision = self.check_and_increment()?;
        if decision.allowed {
            Ok(decision)
        } else {
            Err(QuotaError::RateLimitExceeded {
                account: self.account.clone(),
                limit: self.limit,
                reset_in_secs: decision.reset_in_secs(self.clock.now()),
            })
        }
    }

    /// Current usage without charging
    pub fn status(&self) -> Result<QuotaDecision, QuotaError> {
        let now = self.clock.now();
        let state = self
            .store
            .load(&self.account)?
            .unwrap_or_else(|| QuotaState::new(now, self.limit));
        Ok(state.peek(self.limit, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileQuotaStore, MemoryQuotaStore};
    use gpctl_lock::LockOptions;
    use gpctl_utils::test_support::FixedClock;
    use std::time::Duration;
    use tempfile::TempDir;

    const T0: i64 = 1_699_999_200;

    fn memory_tracker(limit: u32, clock: Arc<FixedClock>) -> QuotaTracker {
        QuotaTracker::new(Arc::new(MemoryQuotaStore::new()), clock, "main", limit)
    }

    #[test]
    fn test_require_headroom_denies_after_limit() {
        let clock = Arc::new(FixedClock::at(T0 + 600));
        let tracker = memory_tracker(2, Arc::clone(&clock));

        assert_eq!(tracker.require_headroom().unwrap().remaining, 1);
        assert_eq!(tracker.require_headroom().unwrap().remaining, 0);

        match tracker.require_headroom() {
            Err(QuotaError::RateLimitExceeded {
                account,
                limit,
                reset_in_secs,
            }) => {
                assert_eq!(account, "main");
                assert_eq!(limit, 2);
                assert_eq!(reset_in_secs, 3000);
            }
            other => panic!("expected RateLimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_status_reflects_usage_without_charging() {
        let clock = Arc::new(FixedClock::at(T0));
        let tracker = memory_tracker(5, Arc::clone(&clock));

        let fresh = tracker.status().unwrap();
        assert_eq!(fresh.used, 0);
        assert_eq!(fresh.remaining, 5);

        tracker.check_and_increment().unwrap();
        tracker.check_and_increment().unwrap();
        let status = tracker.status().unwrap();
        assert_eq!(status.used, 2);
        assert_eq!(tracker.status().unwrap().used, 2);

        clock.advance(3600);
        assert_eq!(tracker.status().unwrap().used, 0);
    }

    #[test]
    fn test_hour_rollover_restores_budget() {
        let clock = Arc::new(FixedClock::at(T0 + 10));
        let tracker = memory_tracker(1, Arc::clone(&clock));

        assert!(tracker.check_and_increment().unwrap().allowed);
        assert!(!tracker.check_and_increment().unwrap().allowed);

        clock.set(T0 + 3601);
        let d = tracker.check_and_increment().unwrap();
        assert!(d.allowed);
        assert_eq!(d.used, 1);
    }

    #[test]
    fn test_file_backed_counter_survives_new_tracker() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::at(T0));
        let make = || {
            QuotaTracker::new(
                Arc::new(FileQuotaStore::new(
                    temp.path(),
                    LockOptions::default().with_wait(Duration::from_secs(1)),
                )),
                Arc::clone(&clock) as Arc<dyn Clock>,
                "agency",
                3,
            )
        };

        make().check_and_increment().unwrap();
        make().check_and_increment().unwrap();
        let d = make().check_and_increment().unwrap();
        assert_eq!(d.used, 3);
        assert!(!make().check_and_increment().unwrap().allowed);
    }
}
