//! Exit code constants for gpctl.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments, configuration or input |
//! | 3 | `PROFILE` | No usable credential profile |
//! | 4 | `CACHE` | Cache required, or population inconsistent |
//! | 5 | `QUOTA_EXCEEDED` | Local hourly quota exhausted |
//! | 6 | `REMOTE_RATE_LIMITED` | API answered 429 |
//! | 7 | `UNAUTHORIZED` | API answered 401 |
//! | 8 | `NOT_FOUND` | API answered 404, or unknown site |
//! | 9 | `LOCK_HELD` | Another process holds a state lock |
//! | 10 | `TRANSPORT_TIMEOUT` | Request timed out |
//! | 11 | `TRANSPORT` | Other transport failure or unexpected status |

/// Exit codes matching the documented exit code table.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) to get the numeric
/// value for `std::process::exit()`.
///
/// ```rust
/// use gpctl_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::QUOTA_EXCEEDED, ExitCode::from_i32(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid CLI arguments, configuration, domain or cache type
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// No profiles, unknown profile, or ambiguous profile choice
    pub const PROFILE: ExitCode = ExitCode(3);

    /// Cache missing without consent, or inconsistent after population
    pub const CACHE: ExitCode = ExitCode(4);

    /// Local hourly quota exhausted
    pub const QUOTA_EXCEEDED: ExitCode = ExitCode(5);

    /// Remote rate limit (HTTP 429)
    pub const REMOTE_RATE_LIMITED: ExitCode = ExitCode(6);

    /// Token rejected (HTTP 401)
    pub const UNAUTHORIZED: ExitCode = ExitCode(7);

    /// Resource not found
    pub const NOT_FOUND: ExitCode = ExitCode(8);

    /// Lock held - another process is updating the same state file
    pub const LOCK_HELD: ExitCode = ExitCode(9);

    /// Request exceeded the configured timeout
    pub const TRANSPORT_TIMEOUT: ExitCode = ExitCode(10);

    /// Any other transport failure or non-2xx status
    pub const TRANSPORT: ExitCode = ExitCode(11);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::PROFILE.as_i32(), 3);
        assert_eq!(ExitCode::CACHE.as_i32(), 4);
        assert_eq!(ExitCode::QUOTA_EXCEEDED.as_i32(), 5);
        assert_eq!(ExitCode::REMOTE_RATE_LIMITED.as_i32(), 6);
        assert_eq!(ExitCode::UNAUTHORIZED.as_i32(), 7);
        assert_eq!(ExitCode::NOT_FOUND.as_i32(), 8);
        assert_eq!(ExitCode::LOCK_HELD.as_i32(), 9);
        assert_eq!(ExitCode::TRANSPORT_TIMEOUT.as_i32(), 10);
        assert_eq!(ExitCode::TRANSPORT.as_i32(), 11);
    }

    #[test]
    fn test_conversions() {
        let code: i32 = ExitCode::LOCK_HELD.into();
        assert_eq!(code, 9);
        assert_eq!(ExitCode::from(4), ExitCode::CACHE);
        assert!(ExitCode::SUCCESS.is_success());
        assert!(!ExitCode::INTERNAL.is_success());
    }
}
