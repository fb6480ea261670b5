//! Configuration loading and the `check` command.

use anyhow::{Context, Result};
use blockwiki_core::Config;
use std::path::Path;

/// Layer `config` over `defaults`, apply the secret override and validate.
pub fn load_config(defaults: &Path, config: &Path, secret: Option<String>) -> Result<Config> {
    tracing::debug!("Loading config from {:?} over {:?}", config, defaults);
    let config = Config::load_layered(defaults, config)
        .context("Failed to load configuration")?
        .with_secret(secret);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Report the resolved configuration; loading already validated it.
pub fn check_config(config: &Config) -> Result<()> {
    tracing::info!("✓ Configuration is valid");
    tracing::info!("  database: {}", config.notion.database_id);
    tracing::info!("  output:   {:?}", config.output_dir());
    tracing::info!("  assets:   {}", config.copy.assets.len());
    Ok(())
}
