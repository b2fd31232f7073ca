//! Configuration management for gpctl
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. The file is TOML with optional
//! `[api]`, `[quota]`, `[cache]` and `[profiles]` sections.

mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use cli_args::CliArgs;
pub use model::*;
pub use discovery::{ENV_BASE_URL, ENV_HOME, ENV_HOURLY_LIMIT, ENV_TOKEN_FILE};
