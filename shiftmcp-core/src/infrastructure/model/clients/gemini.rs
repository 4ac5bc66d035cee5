//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::infrastructure::model::traits::ProviderAdapter;
use crate::infrastructure::model::types::{
    CompletionOptions, CompletionResult, ModelError, TokenUsage,
};

/// Gemini rejects bad keys with 400 INVALID_ARGUMENT rather than 401.
const INVALID_KEY_MARKER: &str = "API key not valid";

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ModelError> {
        Ok(Self {
            base: HttpClientBase::from_config(config)?,
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
        })
    }

    fn build_model_url(&self) -> String {
        let base = self.base.endpoint.trim_end_matches('/');
        let path = self.api_path.trim_matches('/');
        format!("{base}/{path}/{}:generateContent", self.base.model)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiClient {
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
        let url = self.build_model_url();

        let mut generation_config = json!({ "temperature": self.base.temperature(options) });
        if let Some(max_tokens) = self.base.max_tokens(options) {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        let mut payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });
        if let Some(system) = &options.system_prompt {
            payload["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        info!(
            provider = self.base.id.as_str(),
            model = self.base.model.as_str(),
            prompt_chars = prompt.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self
            .base
            .post_with_key_header(&url, "x-goog-api-key", &[], &payload)
            .await
            .map_err(reclassify_invalid_key)?;
        debug!(provider = self.base.id.as_str(), "Received response from Gemini");

        let text = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| ModelError::invalid_response(&self.base.id, "missing text"))?;

        let token_usage = response.usage_metadata.and_then(|u| {
            TokenUsage::from_parts(
                u.prompt_token_count,
                u.candidates_token_count,
                u.total_token_count,
            )
        });

        Ok(CompletionResult {
            text,
            token_usage,
            raw_model_name: response
                .model_version
                .unwrap_or_else(|| self.base.model.clone()),
        })
    }
}

fn reclassify_invalid_key(err: ModelError) -> ModelError {
    match err {
        ModelError::Rejected {
            provider,
            status,
            message,
        } if message.contains(INVALID_KEY_MARKER) => ModelError::Authentication {
            provider,
            status,
            message,
        },
        other => other,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}
