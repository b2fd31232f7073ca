//! `gpctl config`

use anyhow::Result;

use crate::session::Session;

pub fn execute_config_command(session: &Session) -> Result<()> {
    let config = session.config();
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none)"),
    }
    println!();
    for (key, (value, source)) in config.effective_config() {
        println!("{key:<22} = {value:<40} [{source}]");
    }
    Ok(())
}
