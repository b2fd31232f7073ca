//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments and initialises tracing
//! - Builds CliArgs and discovers Config
//! - Creates the tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use gpctl_cache::CacheType;
use gpctl_config::{CliArgs, Config};
use gpctl_utils::logging::{LogFormat, init_tracing};
use gpctl_utils::prompt::TerminalPrompter;
use gpctl_utils::redaction::redact;
use gpctl_utils::time::SystemClock;
use gpctl_utils::{ExitCode, GpError};

use super::args::{CacheCommands, Cli, Commands, LogCommands, ProfileCommands};
use super::commands;
use crate::session::Session;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns `Err(ExitCode)` on
/// failure; main.rs only maps that to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    if let Err(e) = init_tracing(cli.verbose, format) {
        eprintln!("warning: failed to initialise logging: {e}");
    }

    // Pure file utility; needs neither config nor network
    if let Commands::Logs(LogCommands::Combine { input, output }) = &cli.command {
        return match commands::execute_logs_combine_command(input, output) {
            Ok(()) => Ok(()),
            Err(error) => Err(report_error(&error, "logs combine")),
        };
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        base_url: cli.base_url.clone(),
        hourly_limit: cli.hourly_limit,
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = GpError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let session = Session::new(
        config,
        TerminalPrompter::detect(cli.non_interactive),
        Arc::new(SystemClock),
        cli.profile.clone(),
    );

    let operation = match &cli.command {
        Commands::Test => "test",
        Commands::Servers { .. } => "servers",
        Commands::Sites { .. } => "sites",
        Commands::Cache(_) => "cache",
        Commands::Wp { .. } => "wp",
        Commands::Quota { .. } => "quota",
        Commands::Profiles(_) => "profiles",
        Commands::Config => "config",
        Commands::Logs(_) => "logs",
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Test => commands::execute_test_command(&session).await,
            Commands::Servers { refresh, json } => {
                commands::execute_list_command(&session, CacheType::Servers, refresh, json).await
            }
            Commands::Sites { refresh, json } => {
                commands::execute_list_command(&session, CacheType::Sites, refresh, json).await
            }
            Commands::Cache(CacheCommands::Status { cache_type }) => {
                commands::execute_cache_status_command(&session, cache_type.as_deref())
            }
            Commands::Cache(CacheCommands::Refresh { cache_type }) => {
                commands::execute_cache_refresh_command(&session, &cache_type).await
            }
            Commands::Wp {
                domain,
                command,
                args,
            } => commands::execute_wp_command(&session, &domain, &command, &args).await,
            Commands::Quota { json } => commands::execute_quota_command(&session, json),
            Commands::Profiles(ProfileCommands::List) => {
                commands::execute_profiles_list_command(&session)
            }
            Commands::Profiles(ProfileCommands::Bindings) => {
                commands::execute_profiles_bindings_command(&session)
            }
            Commands::Config => commands::execute_config_command(&session),
            Commands::Logs(LogCommands::Combine { input, output }) => {
                commands::execute_logs_combine_command(&input, &output)
            }
        }
    });

    match result {
        Ok(()) => Ok(()),
        Err(error) => Err(report_error(&error, operation)),
    }
}

/// Print a failure to stderr and pick its exit code
fn report_error(error: &anyhow::Error, operation: &str) -> ExitCode {
    if let Some(gp_error) = error.downcast_ref::<GpError>() {
        eprintln!("{}", gp_error.display_for_user());
        return gp_error.to_exit_code();
    }

    eprintln!("✗ {operation} failed: {}", redact(&format!("{error:#}")));
    eprintln!("\n  Run with --verbose for more detailed output");
    ExitCode::INTERNAL
}
