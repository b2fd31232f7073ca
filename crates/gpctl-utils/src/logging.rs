//! Tracing setup for the CLI
//!
//! Logs always go to stderr so stdout stays parseable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Build the default filter. `RUST_LOG` wins when it parses.
#[must_use]
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("gpctl=debug,info")
            } else {
                EnvFilter::try_new("gpctl=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing once per process.
///
/// # Arguments
/// * `verbose` - debug level for gpctl crates, with targets shown
/// * `format` - compact human output or JSON lines
pub fn init_tracing(verbose: bool, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = build_filter(verbose);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Compact if verbose => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_line_number(false)
                        .with_file(false)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .try_init()?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_line_number(false)
                        .with_file(false)
                        .without_time()
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .try_init()?;
        }
    }

    Ok(())
}
