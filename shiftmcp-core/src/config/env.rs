//! Environment-only configuration.
//!
//! Used when no configuration file is present. A provider is registered for
//! every credential variable that is set; Gemini becomes the default when it
//! is available unless `DEFAULT_LLM_PROVIDER` names another registered one.

use super::cluster::ClusterConfig;
use super::error::ConfigError;
use super::provider::ProviderConfig;
use super::AppConfig;
use crate::constants::{DEFAULT_ENV_MAX_TOKENS, DEFAULT_TEMPERATURE};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

struct EnvProvider {
    id: &'static str,
    key_var: &'static str,
    prefix: &'static str,
    default_model: &'static str,
    base_url_var: Option<&'static str>,
}

const ENV_PROVIDERS: [EnvProvider; 4] = [
    EnvProvider {
        id: "gemini",
        key_var: "GEMINI_API_KEY",
        prefix: "GEMINI",
        default_model: "gemini-1.5-flash",
        base_url_var: None,
    },
    EnvProvider {
        id: "openai",
        key_var: "OPENAI_API_KEY",
        prefix: "OPENAI",
        default_model: "gpt-4",
        base_url_var: Some("OPENAI_BASE_URL"),
    },
    EnvProvider {
        id: "claude",
        key_var: "ANTHROPIC_API_KEY",
        prefix: "CLAUDE",
        default_model: "claude-3-sonnet-20240229",
        base_url_var: None,
    },
    EnvProvider {
        id: "custom",
        key_var: "CUSTOM_LLM_API_KEY",
        prefix: "CUSTOM_LLM",
        default_model: "custom",
        base_url_var: Some("CUSTOM_LLM_BASE_URL"),
    },
];

pub(super) fn config_from_env() -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();

    for entry in &ENV_PROVIDERS {
        if let Some(provider) = provider_from_env(entry)? {
            info!(
                provider = entry.id,
                model = provider.model.as_str(),
                "Provider configured from environment"
            );
            config.providers.push(provider);
        }
    }

    if config.providers.is_empty() {
        warn!("No completion providers configured");
    }

    config.default_provider = match non_empty_var("DEFAULT_LLM_PROVIDER") {
        Some(requested) if config.provider(&requested).is_some() => Some(requested),
        Some(requested) => {
            warn!(
                provider = requested.as_str(),
                "DEFAULT_LLM_PROVIDER is not configured; ignoring"
            );
            gemini_default(&config)
        }
        None => gemini_default(&config),
    };

    if let Some(url) = non_empty_var("OPENSHIFT_CLUSTER_URL") {
        config.cluster = Some(ClusterConfig {
            url,
            token: Some("OPENSHIFT_TOKEN".to_string()),
            verify_ssl: parse_flag("OPENSHIFT_VERIFY_SSL")?.unwrap_or(true),
        });
    }

    if let Some(secs) = parse_var::<u64>("TOOL_TIMEOUT_SECS")? {
        if secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        config.timeout = Duration::from_secs(secs);
    }

    config.audit_log = non_empty_var("SHIFTMCP_AUDIT_LOG").map(PathBuf::from);

    Ok(config)
}

fn gemini_default(config: &AppConfig) -> Option<String> {
    config.provider("gemini").map(|p| p.id.clone())
}

fn provider_from_env(entry: &EnvProvider) -> Result<Option<ProviderConfig>, ConfigError> {
    if non_empty_var(entry.key_var).is_none() {
        return Ok(None);
    }

    let base_url = entry.base_url_var.and_then(non_empty_var);
    // The generic HTTP variant has no public endpoint to fall back to.
    if entry.id == "custom" && base_url.is_none() {
        warn!(
            provider = entry.id,
            "CUSTOM_LLM_API_KEY is set without CUSTOM_LLM_BASE_URL; skipping"
        );
        return Ok(None);
    }

    let model = non_empty_var(&format!("{}_MODEL", entry.prefix))
        .unwrap_or_else(|| entry.default_model.to_string());
    let max_tokens =
        parse_var(&format!("{}_MAX_TOKENS", entry.prefix))?.unwrap_or(DEFAULT_ENV_MAX_TOKENS);
    let temperature =
        parse_var(&format!("{}_TEMPERATURE", entry.prefix))?.unwrap_or(DEFAULT_TEMPERATURE);

    let mut provider = ProviderConfig::new(entry.id, entry.id, model)
        .with_api_key(entry.key_var)
        .with_max_tokens(max_tokens)
        .with_temperature(temperature);

    if let Some(url) = base_url {
        provider = provider.with_endpoint(url);
        // OpenAI SDK base URLs already include the `/v1` prefix.
        if entry.id == "openai" {
            provider = provider.with_api_path("/chat/completions");
        }
    }

    Ok(Some(provider))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: name.to_string(),
                value: raw,
            }),
    }
}

fn parse_flag(name: &str) -> Result<Option<bool>, ConfigError> {
    match non_empty_var(name) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnv {
                var: name.to_string(),
                value: raw,
            }),
        },
    }
}
