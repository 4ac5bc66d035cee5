//! Model traits

use super::health::ProviderHealth;
use super::types::{CompletionOptions, CompletionResult, ModelError};
use crate::constants::{PROBE_MAX_TOKENS, PROBE_PROMPT};
use async_trait::async_trait;
use tokio::time::Instant;

/// Uniform interface over one completion backend.
///
/// Variants differ only in request/response marshaling. Every failure is
/// reported as a [`ModelError`]; nothing is swallowed.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Registry key
    fn key(&self) -> &str;

    /// Configured model identifier
    fn model(&self) -> &str;

    /// Send one completion request.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<CompletionResult, ModelError>;

    /// Check connectivity. The default sends a minimal completion.
    async fn probe(&self) -> ProviderHealth {
        let started = Instant::now();
        let options = CompletionOptions::default().with_max_tokens(PROBE_MAX_TOKENS);
        match self.complete(PROBE_PROMPT, &options).await {
            Ok(_) => ProviderHealth::ok(started.elapsed()),
            Err(err) => ProviderHealth::from_error(&err, started.elapsed()),
        }
    }
}
