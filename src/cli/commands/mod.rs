//! CLI command implementations.
//!
//! Handlers return `anyhow::Result`; typed failures are converted to
//! `GpError` before they leave a handler so `run` can pick the exit code.

mod cache;
mod config_cmd;
mod listing;
mod logs;
mod profiles;
mod quota;
mod test_cmd;
mod wp;

pub use cache::{execute_cache_refresh_command, execute_cache_status_command};
pub use config_cmd::execute_config_command;
pub use listing::execute_list_command;
pub use logs::{combine_json_lines, execute_logs_combine_command};
pub use profiles::{execute_profiles_bindings_command, execute_profiles_list_command};
pub use quota::execute_quota_command;
pub use test_cmd::execute_test_command;
pub use wp::execute_wp_command;
