//! Provider factory - creates adapters from config

use super::clients::{ClaudeClient, CustomHttpClient, GeminiClient, OpenAIClient};
use super::traits::ProviderAdapter;
use super::types::ModelError;
use crate::config::{ProviderConfig, ProviderKind};
use std::sync::Arc;

/// Factory for creating provider adapters from provider config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates an adapter based on the provider type.
    ///
    /// Supported types:
    /// - `gemini`, `google` → Gemini `generateContent`
    /// - `claude`, `anthropic` → Anthropic Messages API
    /// - `custom`, `http`, `generic` → generic HTTP backend
    /// - Others → OpenAI-compatible format (default)
    pub fn create(config: &ProviderConfig) -> Result<Arc<dyn ProviderAdapter>, ModelError> {
        let adapter: Arc<dyn ProviderAdapter> = match config.kind() {
            ProviderKind::Gemini => Arc::new(GeminiClient::from_config(config)?),
            ProviderKind::Claude => Arc::new(ClaudeClient::from_config(config)?),
            ProviderKind::Custom => Arc::new(CustomHttpClient::from_config(config)?),
            ProviderKind::OpenAi => Arc::new(OpenAIClient::from_config(config)?),
        };
        Ok(adapter)
    }
}
