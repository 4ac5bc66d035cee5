//! Invocation dispatcher
//!
//! [`Dispatcher::invoke`] is the only entry point for running a tool. It
//! never returns an error: lookup failures, invalid arguments, handler
//! failures and timeouts all come back as an [`InvocationOutcome`] whose
//! error carries an [`ErrorKind`](crate::domain::outcome::ErrorKind).

mod handlers;

use crate::application::tooling::{ToolCatalog, validate_arguments};
use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::domain::outcome::{ErrorKind, InvocationOutcome, ToolFailure};
use crate::domain::types::{ToolArguments, ToolDescriptor, ToolHandler};
use crate::infrastructure::audit::{OutcomeSink, record_outcome};
use crate::infrastructure::cluster::ClusterOperations;
use crate::infrastructure::model::{ProviderHealth, ProviderRegistry};
use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub struct Dispatcher {
    catalog: ToolCatalog,
    registry: ProviderRegistry,
    cluster: Arc<dyn ClusterOperations>,
    timeout: Duration,
    system_prompt: Option<String>,
    sink: Option<Arc<dyn OutcomeSink>>,
}

impl Dispatcher {
    pub fn new(
        catalog: ToolCatalog,
        registry: ProviderRegistry,
        cluster: Arc<dyn ClusterOperations>,
    ) -> Self {
        Self {
            catalog,
            registry,
            cluster,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            system_prompt: None,
            sink: None,
        }
    }

    /// Default bound for [`invoke`](Self::invoke).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// System prompt sent with every completion request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Descriptors in registration order.
    pub fn list_tools(&self) -> slice::Iter<'_, ToolDescriptor> {
        self.catalog.list()
    }

    /// Probe every provider. Entries exist for every registered key.
    pub async fn probe_providers(&self) -> BTreeMap<String, ProviderHealth> {
        self.registry.probe_all().await
    }

    /// Run a tool, bounded by the configured timeout.
    pub async fn invoke(&self, name: &str, args: ToolArguments) -> InvocationOutcome {
        self.invoke_with_timeout(name, args, self.timeout).await
    }

    /// Run a tool with a caller-supplied bound.
    ///
    /// When the bound expires the local wait is abandoned and the outcome
    /// reports `Timeout`. The remote side is not told to stop, so a cluster
    /// mutation may still be applied after a timed-out invocation.
    pub async fn invoke_with_timeout(
        &self,
        name: &str,
        args: ToolArguments,
        timeout: Duration,
    ) -> InvocationOutcome {
        let descriptor = match self.catalog.lookup(name) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                let failure = ToolFailure::new(err.kind(), err.to_string());
                return self
                    .finish(InvocationOutcome::failure(name, failure, Duration::ZERO))
                    .await;
            }
        };

        let args = match validate_arguments(descriptor, args) {
            Ok(args) => args,
            Err(err) => {
                let failure = ToolFailure::new(err.kind(), err.to_string());
                return self
                    .finish(InvocationOutcome::failure(name, failure, Duration::ZERO))
                    .await;
            }
        };

        debug!(tool = name, timeout_ms = timeout.as_millis() as u64, "Invoking tool");
        let handler = descriptor.handler();
        let started = Instant::now();

        // Bounds past the instant range clamp to a far-future deadline.
        let outcome = match tokio::time::timeout(timeout, self.run(handler, &args)).await {
            Ok(output) => InvocationOutcome::from_result(name, output.result, started.elapsed())
                .with_provider(output.provider),
            Err(_) => {
                let message = timeout_message(handler, timeout);
                let failure = ToolFailure::new(ErrorKind::Timeout, message);
                InvocationOutcome::failure(name, failure, started.elapsed())
            }
        };
        self.finish(outcome).await
    }

    async fn finish(&self, outcome: InvocationOutcome) -> InvocationOutcome {
        let elapsed_ms = outcome.elapsed().as_secs_f64() * 1000.0;
        match outcome.error() {
            None => info!(
                tool = outcome.tool(),
                provider = outcome.provider(),
                elapsed_ms,
                "Tool invocation succeeded"
            ),
            Some(failure) => warn!(
                tool = outcome.tool(),
                provider = outcome.provider(),
                kind = %failure.kind,
                elapsed_ms,
                error = failure.message.as_str(),
                "Tool invocation failed"
            ),
        }

        if let Some(sink) = &self.sink {
            record_outcome(sink.as_ref(), &outcome).await;
        }
        outcome
    }
}

fn timeout_message(handler: ToolHandler, timeout: Duration) -> String {
    let base = format!("invocation did not finish within {} ms", timeout.as_millis());
    match handler {
        ToolHandler::Cluster(op) if op.is_mutation() => {
            format!("{base}; the cluster may still apply the {op} request")
        }
        _ => base,
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tools", &self.catalog.len())
            .field("registry", &self.registry)
            .field("timeout", &self.timeout)
            .field("audit", &self.sink.is_some())
            .finish()
    }
}
