//! Defines the structure mirroring the TOML configuration file format.

use crate::core::error::{EvapiError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub(crate) api: ApiConfig,
    #[serde(default)]
    pub(crate) network: NetworkConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ApiConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct NetworkConfig {
    pub(crate) user_agent: Option<String>,
    /// Seconds.
    pub(crate) request_timeout: Option<u64>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| EvapiError::Config(e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EvapiError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }
}
