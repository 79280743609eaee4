//! Configuration loading for photo-search
//!
//! Configuration is loaded from:
//! 1. Environment variable PHOTO_SEARCH_CONFIG_PATH
//! 2. ~/.photo-search/config.toml
//! 3. Default values
//!
//! PHOTO_SEARCH_ENDPOINT overrides the feed endpoint from any source.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote feed query template
    #[serde(default)]
    pub feed: FeedConfig,
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
    /// User-facing messages
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Remote feed query template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base endpoint of the public photo feed
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Value of the `format` parameter
    #[serde(default = "default_format")]
    pub format: String,
    /// Name of the callback parameter
    #[serde(default = "default_callback_param")]
    pub callback_param: String,
    /// Callback marker (empty = omit the parameter)
    #[serde(default = "default_callback")]
    pub callback: String,
    /// Additional fixed query parameters
    #[serde(default)]
    pub extra_params: BTreeMap<String, String>,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Messages shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Initial prompt, restored after a search with results
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Shown when a search fails for any reason
    #[serde(default = "default_error")]
    pub error: String,
    /// Shown when a search succeeds without results
    #[serde(default = "default_empty")]
    pub empty: String,
}

// Default value functions
fn default_endpoint() -> String {
    "https://api.flickr.com/services/feeds/photos_public.gne".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_callback_param() -> String {
    "jsoncallback".to_string()
}

fn default_callback() -> String {
    "JSON_CALLBACK".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("photo-search/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_prompt() -> String {
    "Enter a keyword.".to_string()
}

fn default_error() -> String {
    "There was an error.".to_string()
}

fn default_empty() -> String {
    "No photos found.".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            format: default_format(),
            callback_param: default_callback_param(),
            callback: default_callback(),
            extra_params: BTreeMap::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            error: default_error(),
            empty: default_empty(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(_) => {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        // Endpoint from environment (highest priority)
        if let Ok(endpoint) = std::env::var("PHOTO_SEARCH_ENDPOINT") {
            self.feed.endpoint = endpoint;
        }
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("PHOTO_SEARCH_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.photo-search/config.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".photo-search").join("config.toml");
            return Some(path);
        }

        None
    }
}
