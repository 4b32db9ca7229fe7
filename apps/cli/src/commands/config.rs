//! `heirloom config` - print the resolved service configuration.

use anyhow::Result;

use heirloom_core::ServiceConfig;

pub fn run(config: &ServiceConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
