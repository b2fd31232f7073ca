//! `gpctl servers` / `gpctl sites`
//!
//! Output comes from the local cache; the freshness gate decides whether it
//! has to be (re)populated first.

use anyhow::{Context, Result};
use gpctl_api::ResourceSummary;
use gpctl_cache::CacheType;
use gpctl_utils::GpError;
use tracing::debug;

use crate::session::{ApiCachePopulator, Session};

pub async fn execute_list_command(
    session: &Session,
    cache_type: CacheType,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let populator = ApiCachePopulator::new(session, None);
    let outcome = session
        .gate()
        .ensure(
            cache_type,
            &populator,
            session.prompter(),
            session.now(),
            refresh,
        )
        .await?;

    let rows: Vec<ResourceSummary> = outcome.artifact.read_json().map_err(GpError::from)?;
    debug!(cache_type = %cache_type, action = %outcome.action, count = rows.len(), "Listing");

    if json {
        let text = serde_json::to_string_pretty(&rows).context("Failed to emit JSON")?;
        println!("{text}");
    } else {
        for row in &rows {
            println!("{}\t{}", row.id, row.name);
        }
    }
    Ok(())
}
