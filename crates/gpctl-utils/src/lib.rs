pub mod atomic_write;
pub mod domain;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod paths;
pub mod prompt;
pub mod redaction;
pub mod time;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use error::{GpError, UserFriendlyError};
pub use exit_codes::ExitCode;
