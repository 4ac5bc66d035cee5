//! # Provider Configuration
//!
//! Configuration types for AI completion providers.
//!
//! ## Provider Types
//!
//! | Type | Adapter | Credential |
//! |------|---------|------------|
//! | `gemini`, `google` | Gemini `generateContent` | `x-goog-api-key` |
//! | `claude`, `anthropic` | Anthropic Messages API | `x-api-key` |
//! | `custom`, `http`, `generic` | Generic HTTP `/generate` | optional bearer |
//! | anything else | OpenAI-compatible chat completions | bearer |

use crate::constants::{
    DEFAULT_CLAUDE_ENDPOINT, DEFAULT_GEMINI_ENDPOINT, DEFAULT_OPENAI_ENDPOINT,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Backend family, derived from the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Claude,
    Custom,
}

impl ProviderKind {
    /// Infer the backend family from a provider type string (case-insensitive).
    ///
    /// ```
    /// use shiftmcp_core::config::ProviderKind;
    ///
    /// assert_eq!(ProviderKind::from_type("GEMINI"), ProviderKind::Gemini);
    /// assert_eq!(ProviderKind::from_type("anthropic"), ProviderKind::Claude);
    /// assert_eq!(ProviderKind::from_type("groq"), ProviderKind::OpenAi);
    /// ```
    pub fn from_type(provider_type: &str) -> Self {
        match provider_type.trim().to_lowercase().as_str() {
            "gemini" | "google" | "google-ai" => ProviderKind::Gemini,
            "claude" | "anthropic" => ProviderKind::Claude,
            "custom" | "http" | "generic" => ProviderKind::Custom,
            _ => ProviderKind::OpenAi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Custom => "custom",
        }
    }

    /// Public endpoint used when none is configured. The generic HTTP
    /// variant has no default.
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some(DEFAULT_GEMINI_ENDPOINT),
            ProviderKind::OpenAi => Some(DEFAULT_OPENAI_ENDPOINT),
            ProviderKind::Claude => Some(DEFAULT_CLAUDE_ENDPOINT),
            ProviderKind::Custom => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one completion provider.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "gemini"
/// type = "gemini"
/// api_key = "GEMINI_API_KEY"
/// model = "gemini-1.5-flash"
/// max_tokens = 2048
/// temperature = 0.7
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Registry key (e.g., "gemini", "custom")
    pub id: String,
    /// Backend family: "gemini", "openai", "claude", "custom"
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Base endpoint URL
    pub endpoint: String,
    /// Credential reference: environment variable name or `${VAR}` expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request path override appended to the endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_path: Option<String>,
    /// Health path for the generic HTTP variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        provider_type: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let provider_type = provider_type.into();
        let endpoint = ProviderKind::from_type(&provider_type)
            .default_endpoint()
            .unwrap_or_default()
            .to_string();
        Self {
            id: id.into(),
            provider_type,
            endpoint,
            api_key: None,
            api_path: None,
            health_path: None,
            model: model.into(),
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, reference: impl Into<String>) -> Self {
        self.api_key = Some(reference.into());
        self
    }

    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = Some(path.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn kind(&self) -> ProviderKind {
        ProviderKind::from_type(&self.provider_type)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: Option<String>,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    #[serde(default)]
    pub(super) health_path: Option<String>,
    pub(super) model: Option<String>,
    pub(super) max_tokens: Option<u32>,
    pub(super) temperature: Option<f32>,
    pub(super) timeout_secs: Option<u64>,
}

impl RawProviderConfig {
    /// The `type` field defaults to the provider id, so `id = "gemini"` alone
    /// selects the Gemini adapter.
    pub(super) fn kind(&self) -> ProviderKind {
        ProviderKind::from_type(self.provider_type.as_deref().unwrap_or(&self.id))
    }
}
