// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use ::config::{Environment, File};
use std::collections::HashMap;
use std::path::Path;

/// Load configuration from an optional file (YAML, JSON or TOML) overlaid
/// with the process environment.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
    build_config(path.as_ref().map(AsRef::<Path>::as_ref), None)
}

/// Same as [`load_config`], but reads variables from `vars` instead of the
/// process environment.
pub fn load_config_from_vars(vars: HashMap<String, String>) -> Result<Config> {
    build_config(None, Some(vars))
}

fn build_config(path: Option<&Path>, vars: Option<HashMap<String, String>>) -> Result<Config> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let mut env = Environment::default().try_parsing(true);
    if let Some(vars) = vars {
        env = env.source(Some(vars.into_iter().collect()));
    }

    let config: Config = builder
        .add_source(env)
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    config.validate()?;
    Ok(config)
}
