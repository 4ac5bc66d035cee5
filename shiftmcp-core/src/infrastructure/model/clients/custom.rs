//! Generic HTTP client, driven entirely by configuration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::{DEFAULT_CUSTOM_API_PATH, DEFAULT_CUSTOM_HEALTH_PATH};
use crate::infrastructure::model::health::ProviderHealth;
use crate::infrastructure::model::traits::ProviderAdapter;
use crate::infrastructure::model::types::{
    CompletionOptions, CompletionResult, ModelError, TokenUsage,
};

/// Client for self-hosted backends exposing `POST /generate` and `GET /health`.
#[derive(Clone)]
pub struct CustomHttpClient {
    base: HttpClientBase,
    api_path: String,
    health_path: String,
}

impl CustomHttpClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ModelError> {
        Ok(Self {
            base: HttpClientBase::from_config(config)?,
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOM_API_PATH.to_string()),
            health_path: config
                .health_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOM_HEALTH_PATH.to_string()),
        })
    }
}

#[async_trait]
impl ProviderAdapter for CustomHttpClient {
    fn key(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.base.model
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<CompletionResult, ModelError> {
        let url = self.base.build_url(&self.api_path);

        // The generic contract has no system role; prepend it to the prompt.
        let full_prompt = match &options.system_prompt {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };
        let payload = CustomRequest {
            prompt: &full_prompt,
            model: &self.base.model,
            max_tokens: self.base.max_tokens(options),
            temperature: self.base.temperature(options),
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.base.model.as_str(),
            prompt_chars = prompt.len(),
            "Sending request to custom provider"
        );

        let response: CustomResponse = self.base.post_optional_bearer(&url, &payload).await?;
        debug!(provider = self.base.id.as_str(), "Received response from custom provider");

        let text = response
            .response
            .or(response.content)
            .ok_or_else(|| {
                ModelError::invalid_response(&self.base.id, "missing 'response' or 'content'")
            })?;

        Ok(CompletionResult {
            text,
            token_usage: response
                .tokens_used
                .and_then(|total| TokenUsage::from_parts(None, None, Some(total))),
            raw_model_name: response.model.unwrap_or_else(|| self.base.model.clone()),
        })
    }

    async fn probe(&self) -> ProviderHealth {
        let started = Instant::now();
        let url = self.base.build_url(&self.health_path);
        match self.base.get_ok(&url).await {
            Ok(()) => ProviderHealth::ok(started.elapsed()),
            Err(err) => ProviderHealth::from_error(&err, started.elapsed()),
        }
    }
}

#[derive(Serialize)]
struct CustomRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CustomResponse {
    response: Option<String>,
    content: Option<String>,
    model: Option<String>,
    tokens_used: Option<u64>,
}
