// THEORY:
// Configuration is layered: built-in defaults, then an optional TOML file, then
// environment variables, then whatever the command line overrides last. The
// library owns the first three layers; the CLI applies its flags on top of the
// returned struct and calls `validate` once everything is in place.
//
// Credentials never live in source. The hosted API key comes from the file or,
// preferably, from `GEMINI_API_KEY`, and is redacted from `Debug` output.

use crate::core_modules::stress::PlantSize;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const ENV_BACKEND: &str = "LEAFWATCH_BACKEND";
pub const ENV_LOCAL_URL: &str = "LEAFWATCH_LOCAL_URL";
pub const ENV_HOSTED_URL: &str = "LEAFWATCH_HOSTED_URL";
pub const ENV_HOSTED_MODEL: &str = "LEAFWATCH_HOSTED_MODEL";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";

/// Which remote reasoning backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Hosted,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "hosted" => Ok(BackendKind::Hosted),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Settings for a local `/api/generate` model server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    pub base_url: String,
    pub vision_model: String,
    pub text_model: String,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            vision_model: "llava".into(),
            text_model: "llama3".into(),
        }
    }
}

/// Settings for the hosted generative API.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostedSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-1.5-flash".into(),
            api_key: None,
        }
    }
}

impl fmt::Debug for HostedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LeafwatchConfig {
    pub backend: BackendKind,
    /// Image to analyze when none is given on the command line.
    pub image_path: Option<PathBuf>,
    /// Plant size used for the irrigation estimate.
    pub plant_size: PlantSize,
    /// Per-request timeout. Unset means the HTTP client default.
    pub request_timeout_secs: Option<u64>,
    pub local: LocalSettings,
    pub hosted: HostedSettings,
}

impl LeafwatchConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Defaults or `path`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(url) = lookup(ENV_LOCAL_URL) {
            self.local.base_url = url;
        }
        if let Some(url) = lookup(ENV_HOSTED_URL) {
            self.hosted.base_url = url;
        }
        if let Some(model) = lookup(ENV_HOSTED_MODEL) {
            self.hosted.model = model;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.hosted.api_key = Some(key);
        }
        Ok(())
    }

    /// Checks the settings the selected backend depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            BackendKind::Local => {
                if self.local.base_url.trim().is_empty() {
                    return Err(ConfigError::Empty("local.base_url"));
                }
                if self.local.vision_model.trim().is_empty() {
                    return Err(ConfigError::Empty("local.vision_model"));
                }
                if self.local.text_model.trim().is_empty() {
                    return Err(ConfigError::Empty("local.text_model"));
                }
            }
            BackendKind::Hosted => {
                if self.hosted.base_url.trim().is_empty() {
                    return Err(ConfigError::Empty("hosted.base_url"));
                }
                if self.hosted.model.trim().is_empty() {
                    return Err(ConfigError::Empty("hosted.model"));
                }
                if self.hosted.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                    return Err(ConfigError::MissingApiKey);
                }
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
