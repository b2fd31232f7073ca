use std::fmt;
use std::io;
use thiserror::Error;

pub use gpctl_lock::LockError;

use crate::exit_codes::ExitCode;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `GpError` is what command glue sees. Every component crate returns its own
/// narrow error enum; they all convert into `GpError` via `#[from]`, which then
/// provides:
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration, invalid domain, unknown cache type |
/// | 3 | Credential profile errors |
/// | 4 | Cache errors |
/// | 5 | Local hourly quota exhausted |
/// | 6 | Remote rate limit (HTTP 429) |
/// | 7 | Unauthorized (HTTP 401) |
/// | 8 | Not found (HTTP 404, unknown site) |
/// | 9 | Lock held or lock wait timed out |
/// | 10 | Transport timeout |
/// | 11 | Other transport or unexpected status |
/// | 1 | Everything else |
///
/// Library code returns `GpError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum GpError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Quota error: {0}")]
    Quota(#[from] QuotaError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("File lock error: {0}")]
    Lock(#[from] LockError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Credentials,
    Cache,
    Quota,
    Network,
    Concurrency,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Validation => write!(f, "Validation"),
            Self::Credentials => write!(f, "Credentials"),
            Self::Cache => write!(f, "Cache"),
            Self::Quota => write!(f, "Quota"),
            Self::Network => write!(f, "Network"),
            Self::Concurrency => write!(f, "Concurrency"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

fn reset_phrase(secs: &u64) -> String {
    gpctl_lock::format_age(*secs)
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile { path, reason } => {
                format!("Configuration file {path} has invalid format: {reason}")
            }
            Self::InvalidValue { key, value, reason } => {
                format!("Configuration value '{value}' is not valid for '{key}': {reason}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::Io { path, source } => {
                format!("Could not read configuration file {path}: {source}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile { .. } => Some(
                "Configuration files are TOML with optional [api], [quota], [cache] and [profiles] sections."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => Some(
                "Values may come from CLI flags, GPCTL_* environment variables or the config file."
                    .to_string(),
            ),
            Self::NotFound { .. } => {
                Some("An explicit --config path must point at an existing file.".to_string())
            }
            Self::Io { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile { .. } => vec![
                "Check the TOML syntax of the file".to_string(),
                "Run 'gpctl config' to see which file was loaded".to_string(),
            ],
            Self::InvalidValue { key, .. } => vec![
                format!("Fix the value of '{key}'"),
                "Run 'gpctl config' to see where each value comes from".to_string(),
            ],
            Self::NotFound { .. } => vec![
                "Check the --config path".to_string(),
                "Omit --config to use automatic discovery".to_string(),
            ],
            Self::Io { .. } => vec!["Check file permissions".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

// ============================================================================
// Domain
// ============================================================================

/// Domain sanitization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain '{input}': {reason}")]
    InvalidDomain { input: String, reason: String },
}

impl UserFriendlyError for DomainError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidDomain { input, reason } => {
                format!("'{input}' is not a valid domain: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        Some(
            "Domains are compared after removing the scheme, a leading 'www.', any path and any port."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Pass a bare hostname such as 'example.com'".to_string()]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }
}

// ============================================================================
// Quota
// ============================================================================

/// Client-side hourly quota errors
#[derive(Error, Debug)]
pub enum QuotaError {
    #[error(
        "Hourly request limit of {limit} reached for account '{account}'; resets in {}",
        reset_phrase(.reset_in_secs)
    )]
    RateLimitExceeded {
        account: String,
        limit: u32,
        reset_in_secs: u64,
    },

    #[error("Quota record {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Quota record {path} could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl UserFriendlyError for QuotaError {
    fn user_message(&self) -> String {
        match self {
            Self::RateLimitExceeded {
                account,
                limit,
                reset_in_secs,
            } => format!(
                "All {limit} requests for this hour have been used for account '{account}'. The quota resets in {}.",
                gpctl_lock::format_age(*reset_in_secs)
            ),
            Self::Corrupt { path, reason } => {
                format!("The quota record at {path} could not be parsed: {reason}")
            }
            Self::Io { path, source } => {
                format!("The quota record at {path} could not be accessed: {source}")
            }
            Self::Lock(err) => format!("The quota record is busy: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::RateLimitExceeded { .. } => Some(
                "gpctl counts every API attempt against an hourly budget that resets on the hour."
                    .to_string(),
            ),
            Self::Lock(_) => {
                Some("Another gpctl process is updating the same quota record.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RateLimitExceeded { .. } => vec![
                "Wait until the quota resets".to_string(),
                "Run 'gpctl quota' to inspect usage".to_string(),
                "Raise the budget with --hourly-limit or [quota] hourly_limit if your plan allows it"
                    .to_string(),
            ],
            Self::Corrupt { path, .. } => {
                vec![format!("Delete {path}; it is recreated on the next call")]
            }
            Self::Io { .. } => vec!["Check permissions on the gpctl state directory".to_string()],
            Self::Lock(_) => vec!["Retry once the other gpctl process finishes".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Lock(_) => ErrorCategory::Concurrency,
            Self::Io { .. } | Self::Corrupt { .. } => ErrorCategory::FileSystem,
            Self::RateLimitExceeded { .. } => ErrorCategory::Quota,
        }
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Local cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("The {cache_type} cache is required; populate it with `{command}`")]
    CacheRequired { cache_type: String, command: String },

    #[error(
        "The {cache_type} cache at {path} is missing or empty after population reported success"
    )]
    CachePopulationInconsistent { cache_type: String, path: String },

    #[error("Unknown cache type '{name}' (expected one of: {expected})")]
    UnknownCacheType { name: String, expected: String },

    #[error("Cache file {path} could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cache file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl UserFriendlyError for CacheError {
    fn user_message(&self) -> String {
        match self {
            Self::CacheRequired {
                cache_type,
                command,
            } => format!(
                "The {cache_type} cache does not exist and population was declined. Run `{command}` to create it."
            ),
            Self::CachePopulationInconsistent { cache_type, path } => format!(
                "Refreshing the {cache_type} cache reported success but {path} is still missing or empty"
            ),
            Self::UnknownCacheType { name, expected } => {
                format!("'{name}' is not a cache type. Known types: {expected}")
            }
            Self::Io { path, source } => format!("Cache file {path} could not be accessed: {source}"),
            Self::Corrupt { path, reason } => format!("Cache file {path} could not be parsed: {reason}"),
            Self::Lock(err) => format!("The cache is being refreshed by another process: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::CachePopulationInconsistent { .. } => Some(
                "The API answered but nothing usable was written to the cache file.".to_string(),
            ),
            Self::CacheRequired { .. } => {
                Some("This command reads the site or server list from the local cache.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CacheRequired { command, .. } => vec![format!("Run `{command}`")],
            Self::CachePopulationInconsistent { path, .. } => vec![
                format!("Check that {path} is writable"),
                "Re-run with --verbose to see the API response size".to_string(),
            ],
            Self::UnknownCacheType { .. } => vec!["Use 'sites' or 'servers'".to_string()],
            Self::Io { .. } => vec!["Check permissions on the gpctl state directory".to_string()],
            Self::Corrupt { .. } => vec!["Refresh the cache with `gpctl cache refresh <type>`".to_string()],
            Self::Lock(_) => vec!["Retry once the other gpctl process finishes".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownCacheType { .. } => ErrorCategory::Validation,
            Self::Lock(_) => ErrorCategory::Concurrency,
            Self::Io { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Cache,
        }
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Credential profile errors
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("No credential profiles found in {path}")]
    NoProfilesFound { path: String },

    #[error("Credential profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Several credential profiles are available ({}); choose one with --profile", .available.join(", "))]
    AmbiguousProfile { available: Vec<String> },

    #[error("Malformed token file {path} at line {line}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Duplicate profile '{name}' in {path} at line {line}")]
    Duplicate {
        path: String,
        name: String,
        line: usize,
    },

    #[error("Domain binding store {path} is corrupt: {reason}")]
    BindingsCorrupt { path: String, reason: String },

    #[error("Could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl UserFriendlyError for ProfileError {
    fn user_message(&self) -> String {
        match self {
            Self::NoProfilesFound { path } => {
                format!("No credential profiles are configured (looked in {path})")
            }
            Self::ProfileNotFound { name } => format!("There is no credential profile named '{name}'"),
            Self::AmbiguousProfile { available } => format!(
                "More than one credential profile is available and none could be chosen: {}",
                available.join(", ")
            ),
            Self::Malformed { path, line, reason } => {
                format!("Line {line} of {path} is not a valid profile entry: {reason}")
            }
            Self::Duplicate { path, name, line } => {
                format!("Profile '{name}' is defined twice in {path} (again at line {line})")
            }
            Self::BindingsCorrupt { path, reason } => {
                format!("The domain binding store {path} could not be parsed: {reason}")
            }
            Self::Io { path, source } => format!("Could not access {path}: {source}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::NoProfilesFound { .. } | Self::Malformed { .. } | Self::Duplicate { .. } => Some(
                "The token file holds one 'name=token' entry per line.".to_string(),
            ),
            Self::AmbiguousProfile { .. } => Some(
                "Non-interactive runs cannot ask which profile to use.".to_string(),
            ),
            Self::ProfileNotFound { .. } => Some(
                "Domain bindings remember profile names; the profile may have been removed from the token file."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoProfilesFound { path } => vec![
                format!("Add a line such as 'default=<token>' to {path}"),
                "Point [profiles] token_file or GPCTL_TOKEN_FILE at your token file".to_string(),
            ],
            Self::ProfileNotFound { .. } => vec![
                "Run 'gpctl profiles list' to see available profiles".to_string(),
            ],
            Self::AmbiguousProfile { .. } => vec![
                "Pass --profile <name>".to_string(),
                "Run interactively once to bind the domain to a profile".to_string(),
            ],
            Self::Malformed { .. } | Self::Duplicate { .. } => {
                vec!["Fix the reported line in the token file".to_string()]
            }
            Self::BindingsCorrupt { path, .. } => {
                vec![format!("Delete {path}; bindings are recreated on demand")]
            }
            Self::Io { .. } => vec!["Check file permissions".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Credentials,
        }
    }
}

// ============================================================================
// API
// ============================================================================

/// GridPane API and transport errors
///
/// Messages never contain bearer tokens; transport text is redacted before it
/// is stored here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized request to {endpoint} (HTTP 401)")]
    Unauthorized { endpoint: String },

    #[error("Resource not found at {endpoint} (HTTP 404)")]
    NotFound { endpoint: String },

    #[error("No site named '{domain}' in the sites cache")]
    SiteNotFound { domain: String },

    #[error("Remote rate limit hit at {endpoint} (HTTP 429)")]
    RemoteRateLimited {
        endpoint: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Request to {endpoint} timed out after {timeout_secs}s")]
    TransportTimeout { endpoint: String, timeout_secs: u64 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Argument '{argument}' is not allowed: {reason}")]
    ForbiddenArgument { argument: String, reason: String },
}

impl UserFriendlyError for ApiError {
    fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "The GridPane API rejected the token (401 Unauthorized)".to_string(),
            Self::NotFound { endpoint } => format!("The GridPane API has nothing at {endpoint} (404)"),
            Self::SiteNotFound { domain } => {
                format!("Site '{domain}' is not in the cached site list")
            }
            Self::RemoteRateLimited { retry_after_secs, .. } => match retry_after_secs {
                Some(secs) => format!(
                    "GridPane is rate limiting this account; retry in {}",
                    gpctl_lock::format_age(*secs)
                ),
                None => "GridPane is rate limiting this account (429 Too Many Requests)".to_string(),
            },
            Self::TransportTimeout { endpoint, timeout_secs } => {
                format!("The request to {endpoint} did not finish within {timeout_secs}s")
            }
            Self::Transport(reason) => format!("Could not reach the GridPane API: {reason}"),
            Self::UnexpectedStatus { endpoint, status, .. } => {
                format!("The GridPane API answered {endpoint} with HTTP {status}")
            }
            Self::Decode { endpoint, reason } => {
                format!("The response from {endpoint} was not understood: {reason}")
            }
            Self::ForbiddenArgument { argument, reason } => {
                format!("'{argument}' cannot be passed to WP-CLI: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::RemoteRateLimited { .. } => Some(
                "The server-side limit is separate from gpctl's local hourly budget.".to_string(),
            ),
            Self::UnexpectedStatus { body, .. } if !body.is_empty() => {
                Some(format!("Response body: {body}"))
            }
            Self::SiteNotFound { .. } => {
                Some("Site ids are resolved from the local sites cache.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Unauthorized { .. } => vec![
                "Check the token for the selected profile".to_string(),
                "Run 'gpctl test' to verify connectivity".to_string(),
            ],
            Self::SiteNotFound { .. } => vec!["Refresh the cache with `gpctl cache refresh sites`".to_string()],
            Self::RemoteRateLimited { .. } => vec!["Wait before sending more requests".to_string()],
            Self::TransportTimeout { .. } => vec![
                "Check network connectivity".to_string(),
                "Increase [api] timeout_secs".to_string(),
            ],
            Self::Transport(_) => vec![
                "Check network connectivity".to_string(),
                "Check [api] base_url".to_string(),
            ],
            Self::ForbiddenArgument { .. } => vec!["Remove the argument and retry".to_string()],
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Credentials,
            Self::ForbiddenArgument { .. } => ErrorCategory::Validation,
            Self::SiteNotFound { .. } => ErrorCategory::Cache,
            Self::RemoteRateLimited { .. } => ErrorCategory::Quota,
            _ => ErrorCategory::Network,
        }
    }
}

// ============================================================================
// Lock
// ============================================================================

impl UserFriendlyError for LockError {
    fn user_message(&self) -> String {
        match self {
            LockError::Timeout {
                key,
                holder: Some(holder),
                ..
            } => format!(
                "Another gpctl process ({}) is holding '{key}'",
                holder.describe()
            ),
            LockError::Timeout { key, .. } => {
                format!("Another gpctl process is holding '{key}'")
            }
            LockError::InvalidKey { key } => format!("'{key}' cannot be used as a lock name"),
            other => other.to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        Some("gpctl serializes updates to shared state files across processes.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Wait for the other gpctl process to finish".to_string(),
            "Raise [quota] lock_wait_ms if the other process is expected to be slow".to_string(),
        ]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Concurrency
    }
}

// ============================================================================
// Top level
// ============================================================================

impl UserFriendlyError for GpError {
    fn user_message(&self) -> String {
        match self {
            GpError::Config(e) => e.user_message(),
            GpError::Domain(e) => e.user_message(),
            GpError::Quota(e) => e.user_message(),
            GpError::Cache(e) => e.user_message(),
            GpError::Profile(e) => e.user_message(),
            GpError::Api(e) => e.user_message(),
            GpError::Lock(e) => e.user_message(),
            GpError::Io(e) => format!("File system operation failed: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            GpError::Config(e) => e.context(),
            GpError::Domain(e) => e.context(),
            GpError::Quota(e) => e.context(),
            GpError::Cache(e) => e.context(),
            GpError::Profile(e) => e.context(),
            GpError::Api(e) => e.context(),
            GpError::Lock(e) => e.context(),
            GpError::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            GpError::Config(e) => e.suggestions(),
            GpError::Domain(e) => e.suggestions(),
            GpError::Quota(e) => e.suggestions(),
            GpError::Cache(e) => e.suggestions(),
            GpError::Profile(e) => e.suggestions(),
            GpError::Api(e) => e.suggestions(),
            GpError::Lock(e) => e.suggestions(),
            GpError::Io(_) => vec!["Check file permissions and available disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            GpError::Config(e) => e.category(),
            GpError::Domain(e) => e.category(),
            GpError::Quota(e) => e.category(),
            GpError::Cache(e) => e.category(),
            GpError::Profile(e) => e.category(),
            GpError::Api(e) => e.category(),
            GpError::Lock(e) => e.category(),
            GpError::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl GpError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    ///
    /// The output is passed through the secret redactor before it is returned.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        crate::redaction::redact(&output)
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            GpError::Config(_) | GpError::Domain(_) => ExitCode::CLI_ARGS,

            GpError::Profile(ProfileError::Io { .. }) => ExitCode::INTERNAL,
            GpError::Profile(_) => ExitCode::PROFILE,

            GpError::Cache(CacheError::UnknownCacheType { .. }) => ExitCode::CLI_ARGS,
            GpError::Cache(CacheError::Lock(_)) => ExitCode::LOCK_HELD,
            GpError::Cache(_) => ExitCode::CACHE,

            GpError::Quota(QuotaError::RateLimitExceeded { .. }) => ExitCode::QUOTA_EXCEEDED,
            GpError::Quota(QuotaError::Lock(_)) => ExitCode::LOCK_HELD,
            GpError::Quota(_) => ExitCode::INTERNAL,

            GpError::Api(api) => match api {
                ApiError::RemoteRateLimited { .. } => ExitCode::REMOTE_RATE_LIMITED,
                ApiError::Unauthorized { .. } => ExitCode::UNAUTHORIZED,
                ApiError::NotFound { .. } | ApiError::SiteNotFound { .. } => ExitCode::NOT_FOUND,
                ApiError::TransportTimeout { .. } => ExitCode::TRANSPORT_TIMEOUT,
                ApiError::ForbiddenArgument { .. } => ExitCode::CLI_ARGS,
                ApiError::Transport(_)
                | ApiError::UnexpectedStatus { .. }
                | ApiError::Decode { .. } => ExitCode::TRANSPORT,
            },

            GpError::Lock(_) => ExitCode::LOCK_HELD,
            GpError::Io(_) => ExitCode::INTERNAL,
        }
    }
}
