//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and all subcommand enums.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// gpctl - GridPane API client
#[derive(Parser)]
#[command(name = "gpctl")]
#[command(about = "Command-line client for the GridPane hosting API")]
#[command(long_about = r#"
gpctl lists GridPane servers and sites, runs WP-CLI commands on remote sites,
and keeps a local hourly request budget so scripted use stays under the API's
rate limit.

EXAMPLES:
  # Check that the selected token works
  gpctl test

  # List sites, refreshing the local cache if it is older than an hour
  gpctl sites

  # Run a WP-CLI command on a site
  gpctl wp example.com plugin list --status=active

  # See how many requests are left this hour
  gpctl quota

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > GPCTL_* env > config file > defaults
  Config file is discovered by searching upward from CWD for .gpctl/config.toml
  Use --config to specify an explicit config file path

CREDENTIALS:
  Tokens are read from a name=token file (default ~/.gridpane). The profile
  picked for a domain is remembered and offered first next time.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Credential profile to use, skipping selection
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Never prompt; take the non-interactive choice everywhere
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// GridPane API base URL (default: https://my.gridpane.com)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Requests allowed per account per hour (default: 100)
    #[arg(long, global = true)]
    pub hourly_limit: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify connectivity and credentials (GET /user)
    Test,

    /// List servers from the local cache
    Servers {
        /// Refresh the cache even if it is fresh
        #[arg(long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sites from the local cache
    Sites {
        /// Refresh the cache even if it is fresh
        #[arg(long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or refresh local caches
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Run a WP-CLI command on a site
    Wp {
        /// Site domain (scheme, www. and path are ignored)
        domain: String,

        /// WP-CLI command, e.g. `plugin`
        command: String,

        /// Arguments passed to the command (`--path` is not allowed)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show this hour's request budget for the selected account
    Quota {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Credential profiles and domain bindings
    #[command(subcommand)]
    Profiles(ProfileCommands),

    /// Show the effective configuration and where each value came from
    Config,

    /// Log file utilities
    #[command(subcommand)]
    Logs(LogCommands),
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show age and freshness of each cache
    Status {
        /// Cache type (sites or servers); all when omitted
        cache_type: Option<String>,
    },

    /// Repopulate a cache from the API
    Refresh {
        /// Cache type (sites or servers)
        cache_type: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List profile names from the token file
    List,

    /// Show remembered domain → profile bindings
    Bindings,
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Combine a JSON-lines file into a single pretty-printed JSON array
    Combine {
        /// JSON-lines input file
        input: PathBuf,

        /// Output JSON file
        output: PathBuf,
    },
}

/// Build the clap command, for tests and completions
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}
