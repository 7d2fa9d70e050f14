//! Configuration system (layered: explicit > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::types::CompletionSettings;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_MODEL: &str = "AGENT_REGISTRY_MODEL";
const ENV_TEMPERATURE: &str = "AGENT_REGISTRY_TEMPERATURE";
const ENV_MAX_TOKENS: &str = "AGENT_REGISTRY_MAX_TOKENS";
const ENV_TIMEOUT_SECS: &str = "AGENT_REGISTRY_TIMEOUT_SECS";

/// Settings for the completion service backing the registry.
///
/// A TOML file uses the same field names:
///
/// ```toml
/// default_model = "gpt-4"
/// temperature = 0.2
/// base_url = "http://localhost:8080/v1"
/// ```
#[derive(Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            default_model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

impl RegistryConfig {
    /// Load from environment variables (`.env` honoured) over defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::default().merge_env()
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Platform config location, e.g. `~/.config/agent-registry/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "agent-registry").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolve the full layering: the given file (which must exist) or the
    /// default file (if present), then environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let base = match path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => {
                    debug!(path = %path.display(), "loading config file");
                    Self::load(&path)?
                }
                _ => Self::default(),
            },
        };
        Ok(base.merge_env())
    }

    /// Overlay process environment variables on this config.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.default_model = model;
        }
        if let Some(value) = parse_var(&lookup, ENV_TEMPERATURE) {
            self.temperature = Some(value);
        }
        if let Some(value) = parse_var(&lookup, ENV_MAX_TOKENS) {
            self.max_tokens = Some(value);
        }
        if let Some(value) = parse_var(&lookup, ENV_TIMEOUT_SECS) {
            self.timeout_secs = Some(value);
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Reject values no completion service would accept.
    pub fn validate(&self) -> Result<()> {
        if self.default_model.trim().is_empty() {
            return Err(RegistryError::Configuration(
                "default_model must not be empty".into(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(RegistryError::Configuration(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(RegistryError::Configuration(format!(
                    "temperature {t} outside 0.0..=2.0"
                )));
            }
        }
        Ok(())
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}
