use super::Dispatcher;
use crate::application::prompts::{self, ClusterFacts, NamespaceFacts};
use crate::domain::outcome::{ErrorKind, ProviderUse, ToolFailure};
use crate::domain::types::{
    ClusterOperation, CompletionTask, MetaOperation, ToolArguments, ToolHandler,
};
use crate::infrastructure::cluster::ClusterError;
use crate::infrastructure::model::{CompletionOptions, ModelError};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Namespace names quoted in an analysis prompt when none was requested.
const SAMPLE_NAMESPACES: usize = 5;

pub(super) struct HandlerOutput {
    pub(super) result: Result<Value, ToolFailure>,
    pub(super) provider: Option<ProviderUse>,
}

impl HandlerOutput {
    fn plain(result: Result<Value, ToolFailure>) -> Self {
        Self {
            result,
            provider: None,
        }
    }
}

fn model_failure(err: ModelError) -> ToolFailure {
    ToolFailure::new(err.kind(), err.to_string())
}

fn cluster_failure(err: ClusterError) -> ToolFailure {
    ToolFailure::new(err.kind(), err.to_string())
}

fn count(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}

impl Dispatcher {
    pub(super) async fn run(&self, handler: ToolHandler, args: &ToolArguments) -> HandlerOutput {
        match handler {
            ToolHandler::Cluster(op) => HandlerOutput::plain(
                self.cluster
                    .execute(op, args)
                    .await
                    .map_err(cluster_failure),
            ),
            ToolHandler::Completion(task) => self.run_completion(task, args).await,
            ToolHandler::Meta(op) => HandlerOutput::plain(self.run_meta(op, args).await),
        }
    }

    async fn run_completion(&self, task: CompletionTask, args: &ToolArguments) -> HandlerOutput {
        let adapter = match self.registry.select(args.str("provider")) {
            Ok(adapter) => adapter,
            Err(err) => return HandlerOutput::plain(Err(model_failure(err))),
        };
        let mut used = ProviderUse {
            provider: adapter.key().to_string(),
            model: adapter.model().to_string(),
        };

        let (prompt, cluster_info) = match self.build_prompt(task, args).await {
            Ok(built) => built,
            Err(failure) => {
                return HandlerOutput {
                    result: Err(failure),
                    provider: Some(used),
                };
            }
        };

        let options = CompletionOptions {
            system_prompt: self.system_prompt.clone(),
            ..CompletionOptions::default()
        };
        debug!(
            provider = used.provider.as_str(),
            prompt_chars = prompt.len(),
            "Dispatching completion"
        );

        let result = match adapter.complete(&prompt, &options).await {
            Ok(completion) => {
                if !completion.raw_model_name.is_empty() {
                    used.model = completion.raw_model_name.clone();
                }
                let field = match task {
                    CompletionTask::Ask => "response",
                    CompletionTask::ClusterAnalysis => "analysis",
                    CompletionTask::Troubleshoot => "troubleshooting_help",
                };
                let mut payload = json!({
                    "provider": used.provider,
                    "model": used.model,
                    "token_usage": completion.token_usage,
                });
                payload[field] = Value::String(completion.text);
                if let Some(info) = cluster_info {
                    payload["cluster_info"] = Value::String(info);
                }
                Ok(payload)
            }
            Err(err) => Err(model_failure(err)),
        };

        HandlerOutput {
            result,
            provider: Some(used),
        }
    }

    /// Prompt text plus, for analyses, the rendered cluster facts.
    async fn build_prompt(
        &self,
        task: CompletionTask,
        args: &ToolArguments,
    ) -> Result<(String, Option<String>), ToolFailure> {
        match task {
            CompletionTask::Ask => {
                let question = args.str("question").unwrap_or_default();
                let cluster = self
                    .cluster
                    .describe()
                    .map(|url| format!("Connected to OpenShift cluster: {url}"))
                    .unwrap_or_default();
                let context = args.str("context").unwrap_or_default();
                Ok((prompts::ask(question, &[cluster.as_str(), context]), None))
            }
            CompletionTask::ClusterAnalysis => {
                let facts = self
                    .gather_facts(args.str("namespace"))
                    .await
                    .map_err(|err| {
                        ToolFailure::new(
                            ErrorKind::CollaboratorFailure,
                            format!("failed to gather cluster information: {err}"),
                        )
                    })?;
                Ok((prompts::cluster_analysis(&facts), Some(facts.render())))
            }
            CompletionTask::Troubleshoot => {
                let issue = args.str("issue_description").unwrap_or_default();
                let context = self.troubleshooting_context().await;
                let prompt =
                    prompts::troubleshooting(issue, args.str("error_messages"), context.as_deref());
                Ok((prompt, None))
            }
        }
    }

    async fn gather_facts(&self, namespace: Option<&str>) -> Result<ClusterFacts, ClusterError> {
        let no_args = ToolArguments::new();
        let namespaces = self
            .cluster
            .execute(ClusterOperation::ListNamespaces, &no_args)
            .await?;

        let mut facts = ClusterFacts {
            namespace_count: count(&namespaces),
            ..ClusterFacts::default()
        };

        match namespace {
            Some(name) => {
                let scoped = ToolArguments::new().with("namespace", name);
                let pods = self.cluster.execute(ClusterOperation::ListPods, &scoped).await?;
                let services = self
                    .cluster
                    .execute(ClusterOperation::ListServices, &scoped)
                    .await?;
                let routes = self
                    .cluster
                    .execute(ClusterOperation::ListRoutes, &scoped)
                    .await?;
                facts.namespace = Some(NamespaceFacts {
                    name: name.to_string(),
                    pods: count(&pods),
                    services: count(&services),
                    routes: count(&routes),
                });
            }
            None => {
                facts.sample_namespaces = namespaces
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(|ns| match ns {
                        Value::String(name) => Some(name.clone()),
                        other => other.get("name").and_then(Value::as_str).map(str::to_string),
                    })
                    .take(SAMPLE_NAMESPACES)
                    .collect();
            }
        }
        Ok(facts)
    }

    /// Cluster context for troubleshooting. Best effort: a failing cluster
    /// only shortens the context.
    async fn troubleshooting_context(&self) -> Option<String> {
        self.cluster.describe()?;
        let context = match self
            .cluster
            .execute(ClusterOperation::ListNamespaces, &ToolArguments::new())
            .await
        {
            Ok(namespaces) => format!(
                "Connected to OpenShift cluster with {} namespaces.",
                count(&namespaces)
            ),
            Err(err) => {
                debug!(%err, "Namespace count unavailable for troubleshooting context");
                "Connected to OpenShift cluster.".to_string()
            }
        };
        Some(context)
    }

    async fn run_meta(
        &self,
        op: MetaOperation,
        args: &ToolArguments,
    ) -> Result<Value, ToolFailure> {
        match op {
            MetaOperation::ListProviders => {
                let providers: Vec<Value> = self
                    .registry
                    .keys()
                    .filter_map(|key| self.registry.get(key))
                    .map(|adapter| {
                        json!({
                            "key": adapter.key(),
                            "model": adapter.model(),
                            "last_probe": self.registry.last_health(adapter.key()),
                        })
                    })
                    .collect();
                Ok(json!({
                    "total_providers": providers.len(),
                    "available_providers": providers,
                    "default_provider": self.registry.effective_default(),
                }))
            }
            MetaOperation::ProbeProviders => match args.str("provider") {
                Some(key) => {
                    let health = self.registry.probe(key).await.map_err(model_failure)?;
                    let mut result = Map::new();
                    result.insert(key.to_string(), json!(health));
                    Ok(Value::Object(result))
                }
                None => {
                    let results = self.registry.probe_all().await;
                    Ok(json!({ "connection_results": results }))
                }
            },
        }
    }
}
