// codegen-preview: Configuration (JSON file, environment overrides, CLI overrides)

use crate::format::Format;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("home directory not found")]
    NoHomeDir,
    #[error("invalid service URL '{url}': {reason}")]
    InvalidServiceUrl { url: String, reason: String },
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Where the code-generation service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_url")]
    pub url: String,
    /// Request timeout. Unset means wait for as long as the transport does.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_service_url() -> String {
    "http://localhost:8001".to_string()
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Initial values for the view state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub format: Format,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            format: Format::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://forty-needles-draw.loca.lt".to_string()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a JSON file, falling back to defaults.
    /// Environment overrides apply either way.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (prefix: CODEGEN_PREVIEW_)
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CODEGEN_PREVIEW_SERVICE_URL") {
            self.service.url = v;
        }
        if let Some(v) = lookup("CODEGEN_PREVIEW_SERVICE_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.service.timeout_secs = Some(n),
                Err(_) => tracing::warn!(value = %v, "Ignoring non-numeric service timeout"),
            }
        }
        if let Some(v) = lookup("CODEGEN_PREVIEW_PREVIEW_BASE_URL") {
            self.preview.base_url = v;
        }
        if let Some(v) = lookup("CODEGEN_PREVIEW_PREVIEW_FORMAT") {
            match v.parse() {
                Ok(f) => self.preview.format = f,
                Err(e) => tracing::warn!("Ignoring CODEGEN_PREVIEW_PREVIEW_FORMAT: {}", e),
            }
        }
    }

    /// Get the default config file path: ~/.codegen-preview/config.json
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".codegen-preview").join("config.json"))
    }

    /// Check the service address. The preview base URL is deliberately left
    /// alone; a bad one only shows up as a failed request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidServiceUrl {
            url: self.service.url.clone(),
            reason,
        };
        let parsed = url::Url::parse(&self.service.url).map_err(|e| invalid(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
