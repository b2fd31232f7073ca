use std::path::PathBuf;

/// Configuration overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file (`--config`)
    pub config_path: Option<PathBuf>,
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--hourly-limit`
    pub hourly_limit: Option<u32>,
}
