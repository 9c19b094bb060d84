//! Loading the lock's TOML configuration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use smartlock_emulator::LockConfig;

/// Read and validate the configuration at `path`, or the defaults if no
/// path was given.
pub fn load(path: Option<&Path>) -> Result<LockConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let config: LockConfig = toml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            debug!(path = %path.display(), "loaded configuration");
            config
        }
        None => LockConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}
