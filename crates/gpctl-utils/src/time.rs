//! Wall-clock helpers
//!
//! Timestamps are whole seconds since the UNIX epoch (`i64`). Components take a
//! [`Clock`] so tests can pin or move time.

use chrono::{DateTime, Utc};

pub const HOUR_SECS: i64 = 3600;

/// Start of the wall-clock hour containing `ts`
#[must_use]
pub const fn floor_to_hour(ts: i64) -> i64 {
    ts.div_euclid(HOUR_SECS) * HOUR_SECS
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Real time from the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Render an epoch timestamp as RFC 3339 in UTC
#[must_use]
pub fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_to_hour() {
        assert_eq!(floor_to_hour(0), 0);
        assert_eq!(floor_to_hour(3599), 0);
        assert_eq!(floor_to_hour(3600), 3600);
        assert_eq!(floor_to_hour(1_700_000_123), 1_699_999_200);
        assert_eq!(floor_to_hour(-1), -3600);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2023-11-14
        assert!(SystemClock.now() > 1_700_000_000);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
    }
}
