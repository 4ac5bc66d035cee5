// Shared fakes for integration tests.
//
// Each test binary pulls this in with `#[path = "../support/mod.rs"] mod support;`
// and uses only part of it.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use shiftmcp_core::audit::OutcomeSink;
use shiftmcp_core::cluster::{ClusterError, ClusterOperations};
use shiftmcp_core::model::{
    CompletionOptions, CompletionResult, HealthStatus, ModelError, ProviderAdapter,
    ProviderHealth, TokenUsage,
};
use shiftmcp_core::{
    ClusterOperation, Dispatcher, InvocationOutcome, ProviderRegistry, ToolArguments, ToolCatalog,
};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [`FakeAdapter`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    AuthFailure,
    RateLimited,
    Unreachable,
    BadResponse,
}

impl Reply {
    fn into_result(self, key: &str, model: &str) -> Result<CompletionResult, ModelError> {
        match self {
            Reply::Text(text) => Ok(CompletionResult {
                text,
                token_usage: TokenUsage::from_parts(Some(3), Some(5), None),
                raw_model_name: model.to_string(),
            }),
            Reply::AuthFailure => Err(ModelError::Authentication {
                provider: key.to_string(),
                status: 401,
                message: "invalid api key".to_string(),
            }),
            Reply::RateLimited => Err(ModelError::RateLimited {
                provider: key.to_string(),
                retry_after_secs: Some(30),
                message: "slow down".to_string(),
            }),
            Reply::Unreachable => Err(ModelError::Unavailable {
                provider: key.to_string(),
                status: 503,
                message: "down for maintenance".to_string(),
            }),
            Reply::BadResponse => Err(ModelError::invalid_response(key, "missing text")),
        }
    }
}

/// In-memory provider adapter that records every prompt it receives.
pub struct FakeAdapter {
    key: String,
    model: String,
    reply: Reply,
    delay: Duration,
    probe_status: Option<HealthStatus>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeAdapter {
    pub fn new(key: &str, reply: Reply) -> Self {
        Self {
            key: key.to_string(),
            model: format!("{key}-model"),
            reply,
            delay: Duration::ZERO,
            probe_status: None,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn text(key: &str, text: &str) -> Self {
        Self::new(key, Reply::Text(text.to_string()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fixed probe answer instead of the default completion-based probe.
    pub fn with_probe(mut self, status: HealthStatus) -> Self {
        self.probe_status = Some(status);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl ProviderAdapter for FakeAdapter {
    fn key(&self) -> &str {
        &self.key
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<CompletionResult, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().into_result(&self.key, &self.model)
    }

    async fn probe(&self) -> ProviderHealth {
        match self.probe_status {
            Some(status) => ProviderHealth::new(status, Some(Duration::from_millis(1)), None),
            None => match self.complete("Hello", &CompletionOptions::default()).await {
                Ok(_) => ProviderHealth::ok(Duration::from_millis(1)),
                Err(err) => ProviderHealth::from_error(&err, Duration::from_millis(1)),
            },
        }
    }
}

/// Cluster collaborator answering from a fixed table.
#[derive(Default)]
pub struct FakeCluster {
    responses: HashMap<ClusterOperation, Value>,
    failing: bool,
    delay: Duration,
    description: Option<String>,
    calls: Mutex<Vec<(ClusterOperation, ToolArguments)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, op: ClusterOperation, value: Value) -> Self {
        self.responses.insert(op, value);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn connected_to(mut self, url: &str) -> Self {
        self.description = Some(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(ClusterOperation, ToolArguments)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ClusterOperations for FakeCluster {
    async fn execute(
        &self,
        operation: ClusterOperation,
        args: &ToolArguments,
    ) -> Result<Value, ClusterError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((operation, args.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing {
            return Err(ClusterError::Api {
                status: 403,
                message: "namespaces is forbidden".to_string(),
            });
        }
        Ok(self
            .responses
            .get(&operation)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    fn describe(&self) -> Option<String> {
        self.description.clone()
    }
}

/// Sink that keeps outcomes in memory.
#[derive(Default)]
pub struct MemorySink {
    pub outcomes: Mutex<Vec<InvocationOutcome>>,
}

#[async_trait]
impl OutcomeSink for MemorySink {
    async fn record(&self, outcome: &InvocationOutcome) -> io::Result<()> {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push(outcome.clone());
        Ok(())
    }
}

pub fn registry_with(adapters: Vec<Arc<FakeAdapter>>) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for adapter in adapters {
        registry.register(adapter).expect("unique provider key");
    }
    registry
}

pub fn builtin_dispatcher(registry: ProviderRegistry, cluster: Arc<FakeCluster>) -> Dispatcher {
    let catalog = ToolCatalog::with_builtin_tools().expect("builtin tools");
    Dispatcher::new(catalog, registry, cluster)
}
