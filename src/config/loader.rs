// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PipelineSpec, RawPipelineSpec};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// [`RawPipelineSpec`].
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineSpec> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let spec: RawPipelineSpec = toml::from_str(&contents)?;

    Ok(spec)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` defaults).
/// - Checks that every stage axis is non-empty and that `days_back` and
///   `max_concurrency` are at least 1.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineSpec> {
    let raw = load_from_path(&path)?;
    let spec = PipelineSpec::try_from(raw)?;
    Ok(spec)
}

/// Default config path: `Predflow.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Predflow.toml")
}
