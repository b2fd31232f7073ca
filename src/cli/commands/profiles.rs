//! `gpctl profiles list` / `gpctl profiles bindings`
//!
//! Tokens are never printed.

use anyhow::Result;
use gpctl_utils::GpError;

use crate::session::Session;

pub fn execute_profiles_list_command(session: &Session) -> Result<()> {
    let selector = session.selector();
    let profiles = selector.profiles().map_err(GpError::from)?;
    let bindings = selector.bindings().all().map_err(GpError::from)?;

    for profile in profiles {
        let bound = bindings.values().filter(|p| **p == profile.name).count();
        if bound == 0 {
            println!("{}", profile.name);
        } else {
            println!("{}\t({bound} bound domains)", profile.name);
        }
    }
    Ok(())
}

pub fn execute_profiles_bindings_command(session: &Session) -> Result<()> {
    let bindings = session.selector().bindings().all().map_err(GpError::from)?;
    if bindings.is_empty() {
        println!("No domain bindings yet");
        return Ok(());
    }
    for (domain, profile) in bindings {
        println!("{domain}\t{profile}");
    }
    Ok(())
}
