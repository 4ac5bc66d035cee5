use super::cluster::ClusterConfig;
use super::error::ConfigError;
use super::provider::ProviderConfig;
use crate::constants::{DEFAULT_SYSTEM_PROMPT, DEFAULT_TIMEOUT_SECS};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Startup configuration. Read once, never re-read at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_provider: Option<String>,
    pub system_prompt: String,
    pub timeout: Duration,
    pub audit_log: Option<PathBuf>,
    pub cluster: Option<ClusterConfig>,
    pub providers: Vec<ProviderConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            audit_log: None,
            cluster: None,
            providers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path.
    ///
    /// With `None`, the default path is used when it exists; otherwise the
    /// configuration is discovered from environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"))
    }

    /// Discover providers and cluster settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        super::env::config_from_env()
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }
}
