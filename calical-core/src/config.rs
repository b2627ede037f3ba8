//! Worker configuration.
//!
//! Layered, lowest precedence first:
//!   built-in defaults
//!   a TOML file (`--config`, or ~/.config/calical/config.toml when present)
//!   `CALICAL_*` environment variables (e.g. `CALICAL_LOG_LEVEL=debug`)

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::CodecResult;
use crate::ics::DEFAULT_PRODUCT_ID;

pub const ENV_PREFIX: &str = "CALICAL";
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerConfig {
    /// PRODID written into every encoded calendar
    #[serde(default = "default_product_id")]
    pub product_id: String,

    /// tracing filter directive, e.g. `info` or `calical_core=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            product_id: default_product_id(),
            log_level: default_log_level(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration. A file given here must exist.
    pub fn load(file: Option<&Path>) -> CodecResult<Self> {
        let mut builder = Config::builder()
            .set_default("product_id", DEFAULT_PRODUCT_ID)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).ignore_empty(true))
            .build()?
            .try_deserialize::<WorkerConfig>()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert_eq!(config.product_id, "-//OpenENT Calendar 1.0//EN");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = WorkerConfig::load(Some(Path::new("/nonexistent/calical/config.toml")));
        assert!(matches!(result, Err(CodecError::Config(_))));
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("calical-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "product_id = \"-//Example//Test//EN\"\n").unwrap();

        let config = WorkerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.product_id, "-//Example//Test//EN");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
