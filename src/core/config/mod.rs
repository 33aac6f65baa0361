//! Defines the runtime `Config` struct, its defaults, and file loading.

pub(crate) mod file;

pub use file::ConfigFile;

use crate::core::error::{EvapiError, Result};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Endpoint of the Email Verification API.
pub const DEFAULT_BASE_URL: &str = "https://emailverification.whoisxmlapi.com/api/v2";

/// `User-Agent` sent when none is configured.
pub fn default_user_agent() -> String {
    format!("email-verifier-rs/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("Default base URL failed to parse. This is a bug.")
}

/// Settings a [`Client`](crate::Client) is built from.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: Url,
    pub user_agent: String,
    /// Applied to the default HTTP client only; `None` keeps reqwest's default.
    pub request_timeout: Option<Duration>,

    pub loaded_config_path: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            ..Config::default()
        }
    }

    /// Loads a TOML file and applies it over the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let file = ConfigFile::read(path)?;
        let mut config = Config::default().merge(file)?;
        config.loaded_config_path = Some(path.display().to_string());
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overrides the fields the file sets.
    pub fn merge(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(api_key) = file.api.api_key {
            self.api_key = api_key;
        }
        if let Some(base_url) = file.api.base_url {
            self.base_url = Url::parse(&base_url).map_err(|e| {
                EvapiError::Config(format!("invalid base_url '{}': {}", base_url, e))
            })?;
        }
        if let Some(user_agent) = file.network.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(secs) = file.network.request_timeout {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout: None,
            loaded_config_path: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .field("loaded_config_path", &self.loaded_config_path)
            .finish()
    }
}
