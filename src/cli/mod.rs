//! Command-line interface for gpctl
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions and parsing structures (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations

pub mod args;
mod commands;
mod run;

pub use args::{CacheCommands, Cli, Commands, LogCommands, ProfileCommands, build_cli};
pub use commands::combine_json_lines;
pub use run::run;
