//! Model types - completion options, results and errors

use crate::domain::outcome::ErrorKind;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Generic knobs every adapter maps onto its backend's request shape.
/// Unset fields fall back to the provider's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
}

impl CompletionOptions {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn from_parts(input: Option<u64>, output: Option<u64>, total: Option<u64>) -> Option<Self> {
        let total = total.or_else(|| match (input, output) {
            (None, None) => None,
            (i, o) => Some(i.unwrap_or(0) + o.unwrap_or(0)),
        })?;
        Some(Self {
            input_tokens: input,
            output_tokens: output,
            total_tokens: total,
        })
    }
}

/// Parsed completion returned by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    pub text: String,
    pub token_usage: Option<TokenUsage>,
    /// Model name as reported by the backend
    pub raw_model_name: String,
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' is not configured")]
    ProviderNotFound { provider: String },
    #[error("no completion provider is configured")]
    NoProviderConfigured,
    #[error("provider '{provider}' is registered more than once")]
    DuplicateProvider { provider: String },
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("provider '{provider}' rejected the credentials ({status}): {message}")]
    Authentication {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("provider '{provider}' is rate limiting requests: {message}")]
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
        message: String,
    },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' is unavailable ({status}): {message}")]
    Unavailable {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("provider '{provider}' rejected the request ({status}): {message}")]
    Rejected {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn provider_not_found(provider: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            provider: provider.into(),
        }
    }

    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    /// Transport failure. The request URL is stripped so credentials passed
    /// in query strings never reach logs or outcomes.
    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source: source.without_url(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(
        provider: impl Into<String>,
        status: StatusCode,
        retry_after_secs: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let provider = provider.into();
        let message = message.into();
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Authentication {
                provider,
                status: code,
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                provider,
                retry_after_secs,
                message,
            },
            StatusCode::NOT_FOUND | StatusCode::REQUEST_TIMEOUT => Self::Unavailable {
                provider,
                status: code,
                message,
            },
            s if s.is_server_error() => Self::Unavailable {
                provider,
                status: code,
                message,
            },
            _ => Self::Rejected {
                provider,
                status: code,
                message,
            },
        }
    }

    /// Failure kind reported in invocation outcomes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::ProviderNotFound { .. }
            | ModelError::NoProviderConfigured
            | ModelError::DuplicateProvider { .. } => ErrorKind::UnknownProvider,
            ModelError::MissingApiKey { .. } | ModelError::Authentication { .. } => {
                ErrorKind::ProviderAuthFailure
            }
            ModelError::RateLimited { .. } => ErrorKind::ProviderRateLimited,
            ModelError::Network { .. } | ModelError::Unavailable { .. } => {
                ErrorKind::ProviderUnreachable
            }
            ModelError::Rejected { .. } | ModelError::InvalidResponse { .. } => {
                ErrorKind::ProviderBadResponse
            }
        }
    }
}
