//! gpctl - command-line client for the GridPane hosting API
//!
//! gpctl lists servers and sites, runs WP-CLI commands on remote sites and
//! keeps a client-side hourly request budget that survives across
//! invocations. The work is split across workspace crates:
//!
//! - `gpctl-lock`: cross-process scoped lock files
//! - `gpctl-utils`: errors, exit codes, logging, domain sanitizing, prompts
//! - `gpctl-config`: layered configuration with source attribution
//! - `gpctl-quota`: the persistent hour-bucketed quota tracker
//! - `gpctl-cache`: cache artifacts and the freshness gate
//! - `gpctl-profiles`: credential profiles and domain affinity
//! - `gpctl-api`: HTTP transport, quota guard and typed client
//!
//! This crate wires them into the `gpctl` binary.

pub mod cli;
pub mod session;

pub use gpctl_config::{CliArgs, Config};
pub use gpctl_utils::{ExitCode, GpError};
pub use session::{ApiCachePopulator, Session};
