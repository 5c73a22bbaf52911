use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::UpdateError;
use crate::provider::RecordType;

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_TTL: i16 = 3600;
pub const TOKEN_ENV: &str = "CF_API_TOKEN";

/// Optional settings file. Every key may be left out.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: default_api_base(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Picks the API token: command-line flag, then environment, then config file.
/// Blank values are skipped.
pub fn resolve_api_token(
    flag: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Result<String, UpdateError> {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .ok_or(UpdateError::MissingToken)
}

/// Everything one run needs, fixed before the first request goes out.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub api_base: String,
    pub api_token: String,
    pub domain: String,
    pub record_type: RecordType,
    pub key: String,
    pub content: String,
    pub ttl: i16,
    pub proxied: bool,
    pub upsert: bool,
    pub comment: Option<String>,
}

impl UpdateConfig {
    pub fn validate(&self) -> Result<(), UpdateError> {
        if self.domain.is_empty() {
            return Err(UpdateError::MissingArgument("domain"));
        }
        if self.key.is_empty() || self.content.is_empty() {
            return Err(UpdateError::MissingArgument("key and value"));
        }
        if self.content.parse::<Ipv4Addr>().is_err() {
            return Err(UpdateError::InvalidContent(self.content.clone()));
        }
        Ok(())
    }
}
