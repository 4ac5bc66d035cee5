//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::infrastructure::model::traits::ProviderAdapter;
use crate::infrastructure::model::types::{
    CompletionOptions, CompletionResult, ModelError, TokenUsage,
};

/// OpenAI-compatible client (works with OpenAI, Azure-style gateways, Groq, vLLM, etc.)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ModelError> {
        Ok(Self {
            base: HttpClientBase::from_config(config)?,
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIClient {
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

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &options.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let payload = OpenAIRequest {
            model: &self.base.model,
            messages,
            max_tokens: self.base.max_tokens(options),
            temperature: self.base.temperature(options),
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.base.model.as_str(),
            prompt_chars = prompt.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self.base.post_with_bearer(&url, &payload).await?;
        debug!(
            provider = self.base.id.as_str(),
            "Received response from OpenAI-compatible provider"
        );

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing content"))?;

        let token_usage = response.usage.and_then(|u| {
            TokenUsage::from_parts(u.prompt_tokens, u.completion_tokens, u.total_tokens)
        });

        Ok(CompletionResult {
            text,
            token_usage,
            raw_model_name: response.model.unwrap_or_else(|| self.base.model.clone()),
        })
    }
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}
