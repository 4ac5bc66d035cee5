//! Anthropic Messages API client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::{CLAUDE_API_VERSION, CLAUDE_FALLBACK_MAX_TOKENS, DEFAULT_CLAUDE_API_PATH};
use crate::infrastructure::model::traits::ProviderAdapter;
use crate::infrastructure::model::types::{
    CompletionOptions, CompletionResult, ModelError, TokenUsage,
};

#[derive(Clone)]
pub struct ClaudeClient {
    base: HttpClientBase,
    api_path: String,
}

impl ClaudeClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ModelError> {
        Ok(Self {
            base: HttpClientBase::from_config(config)?,
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_CLAUDE_API_PATH.to_string()),
        })
    }
}

#[async_trait]
impl ProviderAdapter for ClaudeClient {
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

        let payload = ClaudeRequest {
            model: &self.base.model,
            max_tokens: self
                .base
                .max_tokens(options)
                .unwrap_or(CLAUDE_FALLBACK_MAX_TOKENS),
            temperature: self.base.temperature(options),
            system: options.system_prompt.as_deref(),
            messages: vec![json!({ "role": "user", "content": prompt })],
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.base.model.as_str(),
            prompt_chars = prompt.len(),
            "Sending request to Claude"
        );

        let response: ClaudeResponse = self
            .base
            .post_with_key_header(
                &url,
                "x-api-key",
                &[("anthropic-version", CLAUDE_API_VERSION)],
                &payload,
            )
            .await?;
        debug!(provider = self.base.id.as_str(), "Received response from Claude");

        let text: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(ModelError::invalid_response(&self.base.id, "missing text block"));
        }

        let token_usage = response
            .usage
            .and_then(|u| TokenUsage::from_parts(u.input_tokens, u.output_tokens, None));

        Ok(CompletionResult {
            text: text.join(""),
            token_usage,
            raw_model_name: response.model.unwrap_or_else(|| self.base.model.clone()),
        })
    }
}

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Value>,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeBlock>,
    usage: Option<ClaudeUsage>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}
