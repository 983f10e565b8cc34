use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Account backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Remote dictionary service
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Local storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Popular word download
    #[serde(default)]
    pub download: DownloadConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Account backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base URL every backend request path is joined to
    #[serde(default = "default_backend_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_backend_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Dictionary service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DictionaryConfig {
    /// Service endpoint URL
    #[serde(default = "default_dictionary_endpoint")]
    pub endpoint: String,

    /// API key for the service; remote lookups are disabled while empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Language of looked-up words (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language of translations (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_dictionary_endpoint(),
            api_key: String::new(),
            source_language: default_source_language(),
            target_language: default_target_language(),
        }
    }
}

impl DictionaryConfig {
    /// Whether remote lookups can be made
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Language pair in the form the service expects
    pub fn lookup_direction(&self) -> Result<String> {
        crate::language_utils::lookup_direction(&self.source_language, &self.target_language)
    }
}

/// Storage locations; unset paths fall back to the user's data and config dirs
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

/// Popular word download configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadConfig {
    /// Maximum number of concurrent lookups
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Number of popular words requested from the backend
    #[serde(default = "default_download_limit")]
    pub limit: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            limit: default_download_limit(),
        }
    }
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
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Upper bound for concurrent lookups during a download
pub const MAX_CONCURRENT_REQUESTS: usize = 32;

fn default_backend_endpoint() -> String {
    "http://localhost:8000/api/v1/".to_string()
}

fn default_dictionary_endpoint() -> String {
    "https://dictionary.yandex.net/api/v1/dicservice.json/".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ru".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_download_limit() -> usize {
    500
}

fn validate_endpoint(name: &str, endpoint: &str) -> Result<()> {
    let parsed = url::Url::parse(endpoint)
        .with_context(|| format!("Invalid {} endpoint: {}", name, endpoint))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("{} endpoint must use http or https: {}", name, endpoint));
    }
    Ok(())
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_endpoint("Backend", &self.backend.endpoint)?;
        validate_endpoint("Dictionary", &self.dictionary.endpoint)?;

        if self.backend.timeout_secs == 0 {
            return Err(anyhow!("Backend timeout must be at least one second"));
        }

        // Validate languages
        let _direction = self.dictionary.lookup_direction()?;

        let api_key = self.dictionary.api_key.trim();
        if api_key.is_empty() {
            warn!("Dictionary API key is not set, only local words are available");
        } else if api_key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(anyhow!("Dictionary API key contains whitespace"));
        }

        let concurrency = self.download.concurrent_requests;
        if concurrency == 0 || concurrency > MAX_CONCURRENT_REQUESTS {
            return Err(anyhow!(
                "Concurrent requests must be between 1 and {}, got {}",
                MAX_CONCURRENT_REQUESTS,
                concurrency
            ));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load a configuration file, writing the defaults first when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }
}
