use super::cluster::{ClusterConfig, RawClusterConfig};
use super::error::ConfigError;
use super::provider::{ProviderConfig, RawProviderConfig};
use super::AppConfig;
use crate::constants::{
    CONFIG_PATH, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, ENV_PATHS,
};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    default_provider: Option<String>,
    system_prompt: Option<String>,
    timeout_secs: Option<u64>,
    audit_log: Option<PathBuf>,
    cluster: Option<RawClusterConfig>,
    #[serde(default)]
    providers: Vec<RawProviderConfig>,
}

/// Ensures environment variables are loaded from the `.env` files
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        for path in ENV_PATHS {
            if from_filename(path).is_ok() {
                debug!(path, "Loaded environment file");
            }
        }
    });
}

/// Load and validate configuration.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                info!(
                    path = CONFIG_PATH,
                    "No configuration file found; discovering settings from environment"
                );
                super::env::config_from_env()
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading server configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let timeout_secs = parsed.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    let mut providers = Vec::with_capacity(parsed.providers.len());
    for raw in parsed.providers {
        if !seen.insert(raw.id.clone()) {
            return Err(ConfigError::DuplicateProvider { provider: raw.id });
        }
        providers.push(build_provider(raw)?);
    }

    if let Some(default) = &parsed.default_provider {
        if !providers.iter().any(|p| &p.id == default) {
            return Err(ConfigError::ProviderNotFound {
                provider: default.clone(),
            });
        }
    }

    let cluster = parsed.cluster.map(build_cluster).transpose()?;

    Ok(AppConfig {
        default_provider: parsed.default_provider,
        system_prompt: parsed
            .system_prompt
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        timeout: Duration::from_secs(timeout_secs),
        audit_log: parsed.audit_log,
        cluster,
        providers,
    })
}

fn build_provider(raw: RawProviderConfig) -> Result<ProviderConfig, ConfigError> {
    let kind = raw.kind();
    let endpoint = match raw.endpoint.clone().filter(|e| !e.trim().is_empty()) {
        Some(endpoint) => endpoint,
        None => kind
            .default_endpoint()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingEndpoint {
                provider: raw.id.clone(),
            })?,
    };
    let model = raw
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingModel {
            provider: raw.id.clone(),
        })?;
    let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }

    Ok(ProviderConfig {
        provider_type: raw
            .provider_type
            .unwrap_or_else(|| kind.as_str().to_string()),
        id: raw.id,
        endpoint,
        api_key: raw.api_key,
        api_path: raw.api_path,
        health_path: raw.health_path,
        model,
        max_tokens: raw.max_tokens,
        temperature: raw.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        timeout_secs,
    })
}

fn build_cluster(raw: RawClusterConfig) -> Result<ClusterConfig, ConfigError> {
    let url = raw
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(ConfigError::MissingClusterUrl)?;
    Ok(ClusterConfig {
        url,
        token: raw.token,
        verify_ssl: raw.verify_ssl.unwrap_or(true),
    })
}
