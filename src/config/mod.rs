//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Example configuration written by `shimmer init`
pub const EXAMPLE_CONFIG: &str = include_str!("../../shimmer.example.yaml");

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ShimmerConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    let config: ShimmerConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults
pub fn load_or_default(path: &Path) -> Result<ShimmerConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config at {:?}, using defaults", path);
        Ok(ShimmerConfig::default())
    }
}
