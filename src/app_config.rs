use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;
use log::warn;

use crate::providers::gemini::DEFAULT_ENDPOINT;

/// Application configuration module
/// This module handles loading, validating and saving the configuration.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Gemini API key; may also come from the command line or environment
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifiers probed in order
    #[serde(default = "default_candidate_models")]
    pub candidate_models: Vec<String>,

    /// Temperature for correct/translate requests; model default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Output token cap for correct/translate requests; model default when unset
    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional style hint, e.g. "trinh thám" or "review phim"
    #[serde(default)]
    pub style: Option<String>,

    /// Directory for output files; next to the input when unset
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_candidate_models() -> Vec<String> {
    [
        "models/gemini-2.0-flash-exp",
        "models/gemini-1.5-flash",
        "gemini-2.0-flash-exp",
        "gemini-1.5-flash",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration, writing a default file first if none exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    ///
    /// The API key is not checked here; it is checked by the probe so that
    /// commands not talking to the service still work without one.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow!("Endpoint must use http or https: {}", self.endpoint));
        }

        if self.candidate_models.iter().all(|m| m.trim().is_empty()) {
            return Err(anyhow!("At least one candidate model is required"));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", temperature));
            }
        }

        if self.max_output_tokens == Some(0) {
            return Err(anyhow!("max_output_tokens must be greater than zero"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    /// Style hint, ignoring blank values
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            endpoint: default_endpoint(),
            candidate_models: default_candidate_models(),
            temperature: None,
            max_output_tokens: None,
            timeout_secs: default_timeout_secs(),
            style: None,
            output_dir: None,
            log_level: LogLevel::default(),
        }
    }
}
