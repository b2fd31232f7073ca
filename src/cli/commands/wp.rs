//! `gpctl wp <domain> <command> [args...]`
//!
//! Order matters: the domain and arguments are validated before a profile is
//! chosen, the cache is consulted, or any request is charged.

use anyhow::{Context, Result};
use gpctl_api::{ResourceSummary, check_wp_arguments};
use gpctl_cache::CacheType;
use gpctl_utils::GpError;
use gpctl_utils::domain::{matches_domain, sanitize_domain};
use gpctl_utils::error::ApiError;
use serde_json::Value;

use crate::session::{ApiCachePopulator, Session};

pub async fn execute_wp_command(
    session: &Session,
    domain: &str,
    command: &str,
    args: &[String],
) -> Result<()> {
    let domain = sanitize_domain(domain).map_err(GpError::from)?;
    check_wp_arguments(command, args).map_err(GpError::from)?;

    let profile = session.select_profile(Some(&domain))?;
    let populator = ApiCachePopulator::new(session, Some(profile.clone()));
    let outcome = session
        .gate()
        .ensure(
            CacheType::Sites,
            &populator,
            session.prompter(),
            session.now(),
            false,
        )
        .await?;

    let sites: Vec<ResourceSummary> = outcome.artifact.read_json().map_err(GpError::from)?;
    let site = find_site(&sites, &domain)
        .ok_or_else(|| GpError::from(ApiError::SiteNotFound { domain: domain.clone() }))?;

    let output = session
        .client(&profile)?
        .run_wp_cli(site.id, command, args)
        .await?;
    match output {
        Value::Null => {}
        Value::String(text) => println!("{text}"),
        other => println!(
            "{}",
            serde_json::to_string_pretty(&other).context("Failed to emit JSON")?
        ),
    }
    Ok(())
}

fn find_site<'a>(sites: &'a [ResourceSummary], domain: &str) -> Option<&'a ResourceSummary> {
    sites.iter().find(|site| matches_domain(&site.name, domain))
}
