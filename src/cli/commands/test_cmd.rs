//! Test command implementation
//!
//! Handles `gpctl test`: a single charged `GET /user` with the selected profile.

use anyhow::Result;
use gpctl_utils::GpError;

use crate::session::Session;

pub async fn execute_test_command(session: &Session) -> Result<()> {
    let profile = session.select_profile(None)?;
    let client = session.client(&profile)?;
    client.test_connection().await?;

    let status = session.tracker(&profile).status().map_err(GpError::from)?;
    println!(
        "✓ Connected to {} with profile '{}'",
        session.config().api.base_url,
        profile.name
    );
    println!("  {} of {} requests left this hour", status.remaining, status.limit);
    Ok(())
}
