//! `gpctl quota`

use anyhow::{Context, Result};
use gpctl_lock::format_age;
use gpctl_utils::GpError;
use gpctl_utils::time::format_timestamp;
use serde::Serialize;

use crate::session::Session;

#[derive(Serialize)]
struct QuotaReport<'a> {
    account: &'a str,
    used: u32,
    remaining: u32,
    limit: u32,
    reset_at: String,
    reset_in_secs: u64,
}

pub fn execute_quota_command(session: &Session, json: bool) -> Result<()> {
    let profile = session.select_profile(None)?;
    let status = session.tracker(&profile).status().map_err(GpError::from)?;
    let now = session.now();

    let report = QuotaReport {
        account: &profile.name,
        used: status.used,
        remaining: status.remaining,
        limit: status.limit,
        reset_at: format_timestamp(status.reset_at),
        reset_in_secs: status.reset_in_secs(now),
    };

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to emit JSON")?;
        println!("{text}");
    } else {
        println!("Account:   {}", report.account);
        println!("Used:      {}/{}", report.used, report.limit);
        println!("Remaining: {}", report.remaining);
        println!(
            "Resets:    {} (in {})",
            report.reset_at,
            format_age(report.reset_in_secs)
        );
    }
    Ok(())
}
