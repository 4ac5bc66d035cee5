use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("provider '{provider}' is defined more than once")]
    DuplicateProvider { provider: String },

    #[error("default provider '{provider}' not found in configured providers")]
    ProviderNotFound { provider: String },

    #[error("provider '{provider}' is missing required field 'endpoint'")]
    MissingEndpoint { provider: String },

    #[error("provider '{provider}' is missing required field 'model'")]
    MissingModel { provider: String },

    #[error("cluster section is missing required field 'url'")]
    MissingClusterUrl,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("environment variable {var} has invalid value '{value}'")]
    InvalidEnv { var: String, value: String },
}
