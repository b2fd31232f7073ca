//! `gpctl cache status` / `gpctl cache refresh`

use anyhow::Result;
use gpctl_api::ResourceSummary;
use gpctl_cache::{CacheType, Freshness};
use gpctl_lock::format_age;
use gpctl_utils::GpError;

use crate::session::{ApiCachePopulator, Session};

fn parse_types(name: Option<&str>) -> Result<Vec<CacheType>, GpError> {
    match name {
        Some(name) => Ok(vec![CacheType::parse(name)?]),
        None => Ok(CacheType::all().collect()),
    }
}

pub fn execute_cache_status_command(session: &Session, cache_type: Option<&str>) -> Result<()> {
    let types = parse_types(cache_type)?;
    let gate = session.gate();
    let now = session.now();

    for cache_type in types {
        let artifact = gate.probe(cache_type).map_err(GpError::from)?;
        let (state, age) = match artifact.freshness(now, gate.max_age_secs()) {
            Freshness::Missing => ("missing", "-".to_string()),
            Freshness::Fresh { age_secs } => ("fresh", format_age(age_secs)),
            Freshness::Stale { age_secs } => ("stale", format_age(age_secs)),
        };
        println!(
            "{:<8} {:<8} {:<6} {}",
            cache_type.to_string(),
            state,
            age,
            artifact.path.display()
        );
    }
    Ok(())
}

pub async fn execute_cache_refresh_command(session: &Session, cache_type: &str) -> Result<()> {
    let cache_type = CacheType::parse(cache_type).map_err(GpError::from)?;
    let populator = ApiCachePopulator::new(session, None);
    let outcome = session
        .gate()
        .ensure(cache_type, &populator, session.prompter(), session.now(), true)
        .await?;

    let rows: Vec<ResourceSummary> = outcome.artifact.read_json().map_err(GpError::from)?;
    println!("✓ Refreshed {cache_type} cache ({} entries)", rows.len());
    Ok(())
}
