use gpctl_utils::time::{HOUR_SECS, floor_to_hour};
use serde::{Deserialize, Serialize};

/// Persisted counter for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Requests charged in the current window
    pub count: u32,
    /// Epoch seconds, floored to the hour
    pub window_start: i64,
    /// Limit in force when the record was last written
    pub limit: u32,
}

/// Result of a quota check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub used: u32,
    pub remaining: u32,
    pub limit: u32,
    /// Epoch seconds at which the window rolls over
    pub reset_at: i64,
}

impl QuotaDecision {
    /// Seconds from `now` until the window resets, never negative
    #[must_use]
    pub fn reset_in_secs(&self, now: i64) -> u64 {
        u64::try_from(self.reset_at.saturating_sub(now)).unwrap_or(0)
    }
}

impl QuotaState {
    /// Fresh record for the hour containing `now`
    #[must_use]
    pub const fn new(now: i64, limit: u32) -> Self {
        Self {
            count: 0,
            window_start: floor_to_hour(now),
            limit,
        }
    }

    /// Start a new window if the hour has moved forward.
    ///
    /// A clock that moved backwards keeps the newer window so the counter can
    /// never be reset early.
    fn roll_window(&mut self, now: i64) {
        let current_window = floor_to_hour(now);
        if current_window > self.window_start {
            self.count = 0;
            self.window_start = current_window;
        }
    }

    /// Charge one request if the budget allows it.
    ///
    /// A `limit` of zero denies everything.
    pub fn check_and_increment(&mut self, limit: u32, now: i64) -> QuotaDecision {
        self.roll_window(now);
        self.limit = limit;
        let reset_at = self.window_start + HOUR_SECS;

        if limit == 0 || self.count >= limit {
            return QuotaDecision {
                allowed: false,
                used: self.count,
                remaining: 0,
                limit,
                reset_at,
            };
        }

        self.count += 1;
        QuotaDecision {
            allowed: true,
            used: self.count,
            remaining: limit - self.count,
            limit,
            reset_at,
        }
    }

    /// Same figures as [`check_and_increment`](Self::check_and_increment)
    /// without charging; `allowed` says whether a call would be accepted now.
    #[must_use]
    pub fn peek(&self, limit: u32, now: i64) -> QuotaDecision {
        let mut probe = *self;
        probe.roll_window(now);
        QuotaDecision {
            allowed: limit > 0 && probe.count < limit,
            used: probe.count,
            remaining: limit.saturating_sub(probe.count),
            limit,
            reset_at: probe.window_start + HOUR_SECS,
        }
    }
}
