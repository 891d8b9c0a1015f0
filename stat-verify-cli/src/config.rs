//! Layered settings for the verification engine

use anyhow::{Context as _, Result};
use config::{Config as ConfigLoader, Environment, File};
use stat_verify_core::VerificationSettings;
use std::path::Path;

/// Prefix of environment overrides, e.g. `STAT_VERIFY_ABSOLUTE_TOLERANCE`
pub const ENV_PREFIX: &str = "STAT_VERIFY";

/// Load settings from `config/default`, `config/local`, an optional explicit
/// file and the environment, later sources overriding earlier ones.
pub fn load(explicit: Option<&Path>) -> Result<VerificationSettings> {
    let mut builder = ConfigLoader::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }

    let settings: VerificationSettings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    tracing::debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}
