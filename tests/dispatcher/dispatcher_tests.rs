// Dispatcher tests - routing, validation and outcome normalisation

#[path = "../support/mod.rs"]
mod support;

use serde_json::json;
use shiftmcp_core::{
    ClusterOperation, CompletionTask, Dispatcher, ErrorKind, ParamSpec, ProviderRegistry,
    ToolArguments, ToolCatalog, ToolDescriptor, ToolHandler,
};
use std::sync::Arc;
use std::time::Duration;
use support::{FakeAdapter, FakeCluster, Reply, builtin_dispatcher, registry_with};

fn scenario_catalog() -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    catalog
        .register(ToolDescriptor::new(
            "list-namespaces",
            "List all namespaces",
            ToolHandler::Cluster(ClusterOperation::ListNamespaces),
        ))
        .expect("register");
    catalog
        .register(
            ToolDescriptor::new(
                "ask-ai",
                "Ask a question",
                ToolHandler::Completion(CompletionTask::Ask),
            )
            .param(ParamSpec::string("question").required())
            .param(ParamSpec::string("provider")),
        )
        .expect("register");
    catalog
        .register(
            ToolDescriptor::new(
                "delete-pod",
                "Delete a pod",
                ToolHandler::Cluster(ClusterOperation::DeletePod),
            )
            .param(ParamSpec::string("namespace").required())
            .param(ParamSpec::string("pod_name").required()),
        )
        .expect("register");
    catalog
}

fn scenario_dispatcher(registry: ProviderRegistry, cluster: Arc<FakeCluster>) -> Dispatcher {
    Dispatcher::new(scenario_catalog(), registry, cluster)
}

#[tokio::test]
async fn cluster_tool_returns_collaborator_listing() {
    let cluster = Arc::new(
        FakeCluster::new().respond(ClusterOperation::ListNamespaces, json!(["dev", "prod"])),
    );
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), cluster.clone());

    let outcome = dispatcher
        .invoke("list-namespaces", ToolArguments::new())
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.result(), Some(&json!(["dev", "prod"])));
    assert!(outcome.error().is_none());
    assert!(outcome.provider().is_none());
    assert_eq!(cluster.calls().len(), 1);
}

#[tokio::test]
async fn completion_without_providers_reports_unknown_provider() {
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("ask-ai", ToolArguments::new().with("question", "x"))
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.error_kind(), Some(ErrorKind::UnknownProvider));
    assert!(outcome.result().is_none());
}

#[tokio::test]
async fn explicit_provider_routes_to_that_adapter() {
    let gemini = Arc::new(FakeAdapter::text("gemini", "from gemini"));
    let custom = Arc::new(FakeAdapter::text("custom", "from custom"));
    let registry = registry_with(vec![gemini.clone(), custom.clone()]).with_default("gemini");
    let dispatcher = scenario_dispatcher(registry, Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke(
            "ask-ai",
            ToolArguments::new()
                .with("question", "x")
                .with("provider", "custom"),
        )
        .await;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert_eq!(outcome.provider(), Some("custom"));
    assert_eq!(outcome.model(), Some("custom-model"));
    assert_eq!(outcome.result().unwrap()["response"], "from custom");
    assert_eq!(custom.calls(), 1);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn default_provider_serves_requests_without_a_key() {
    let gemini = Arc::new(FakeAdapter::text("gemini", "from gemini"));
    let custom = Arc::new(FakeAdapter::text("custom", "from custom"));
    let registry = registry_with(vec![custom.clone(), gemini.clone()]).with_default("gemini");
    let dispatcher = scenario_dispatcher(registry, Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("ask-ai", ToolArguments::new().with("question", "x"))
        .await;

    assert_eq!(outcome.provider(), Some("gemini"));
    assert_eq!(gemini.calls(), 1);
    assert_eq!(custom.calls(), 0);
}

#[tokio::test]
async fn auth_failure_is_reported_with_elapsed_time() {
    let adapter = Arc::new(
        FakeAdapter::new("gemini", Reply::AuthFailure).with_delay(Duration::from_millis(5)),
    );
    let dispatcher =
        scenario_dispatcher(registry_with(vec![adapter]), Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("ask-ai", ToolArguments::new().with("question", "x"))
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.error_kind(), Some(ErrorKind::ProviderAuthFailure));
    assert!(outcome.elapsed() > Duration::ZERO);
    assert_eq!(outcome.provider(), Some("gemini"));
}

#[tokio::test]
async fn adapter_failures_map_to_distinct_kinds() {
    let cases = [
        (Reply::RateLimited, ErrorKind::ProviderRateLimited),
        (Reply::Unreachable, ErrorKind::ProviderUnreachable),
        (Reply::BadResponse, ErrorKind::ProviderBadResponse),
    ];

    for (reply, expected) in cases {
        let adapter = Arc::new(FakeAdapter::new("p", reply));
        let dispatcher =
            scenario_dispatcher(registry_with(vec![adapter]), Arc::new(FakeCluster::new()));
        let outcome = dispatcher
            .invoke("ask-ai", ToolArguments::new().with("question", "x"))
            .await;
        assert_eq!(outcome.error_kind(), Some(expected));
    }
}

#[tokio::test]
async fn unknown_explicit_provider_is_rejected() {
    let gemini = Arc::new(FakeAdapter::text("gemini", "hi"));
    let dispatcher = scenario_dispatcher(
        registry_with(vec![gemini.clone()]),
        Arc::new(FakeCluster::new()),
    );

    let outcome = dispatcher
        .invoke(
            "ask-ai",
            ToolArguments::new()
                .with("question", "x")
                .with("provider", "nonexistent"),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::UnknownProvider));
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn unknown_tool_has_zero_elapsed() {
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), Arc::new(FakeCluster::new()));

    for args in [
        ToolArguments::new(),
        ToolArguments::new().with("question", "x"),
    ] {
        let outcome = dispatcher.invoke("does-not-exist", args).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::UnknownTool));
        assert_eq!(outcome.elapsed(), Duration::ZERO);
    }
}

#[tokio::test]
async fn missing_required_argument_never_reaches_the_handler() {
    let cluster = Arc::new(FakeCluster::new());
    let adapter = Arc::new(FakeAdapter::text("gemini", "hi"));
    let dispatcher = scenario_dispatcher(registry_with(vec![adapter.clone()]), cluster.clone());

    let outcome = dispatcher
        .invoke("delete-pod", ToolArguments::new().with("namespace", "dev"))
        .await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidArguments));
    assert!(cluster.calls().is_empty());

    let outcome = dispatcher.invoke("ask-ai", ToolArguments::new()).await;
    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidArguments));
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn type_mismatch_is_invalid_arguments() {
    let cluster = Arc::new(FakeCluster::new());
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), cluster.clone());

    let outcome = dispatcher
        .invoke(
            "delete-pod",
            ToolArguments::new()
                .with("namespace", "dev")
                .with("pod_name", 42),
        )
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidArguments));
    assert!(cluster.calls().is_empty());
}

#[tokio::test]
async fn extra_arguments_are_ignored() {
    let cluster = Arc::new(FakeCluster::new());
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), cluster.clone());

    let outcome = dispatcher
        .invoke(
            "delete-pod",
            ToolArguments::new()
                .with("namespace", "dev")
                .with("pod_name", "web-1")
                .with("grace_period", 30),
        )
        .await;

    assert!(outcome.is_success());
    assert_eq!(cluster.calls()[0].0, ClusterOperation::DeletePod);
}

#[tokio::test]
async fn collaborator_errors_become_collaborator_failure() {
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), Arc::new(FakeCluster::failing()));

    let outcome = dispatcher
        .invoke("list-namespaces", ToolArguments::new())
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::CollaboratorFailure));
    assert!(outcome.error().unwrap().message.contains("forbidden"));
}

#[tokio::test]
async fn list_tools_is_stable() {
    let dispatcher = scenario_dispatcher(ProviderRegistry::new(), Arc::new(FakeCluster::new()));

    let first: Vec<_> = dispatcher.list_tools().cloned().collect();
    let second: Vec<_> = dispatcher.list_tools().cloned().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn builtin_defaults_are_filled_before_the_handler_runs() {
    let cluster = Arc::new(FakeCluster::new().respond(ClusterOperation::GetPodLogs, json!("ok")));
    let dispatcher = builtin_dispatcher(ProviderRegistry::new(), cluster.clone());

    let outcome = dispatcher
        .invoke(
            "get_pod_logs",
            ToolArguments::new()
                .with("namespace", "dev")
                .with("pod_name", "web-1"),
        )
        .await;

    assert!(outcome.is_success());
    let (_, args) = &cluster.calls()[0];
    assert_eq!(args.i64("tail_lines"), Some(100));
}

#[tokio::test]
async fn cluster_analysis_gathers_facts_before_asking() {
    let cluster = Arc::new(
        FakeCluster::new()
            .respond(ClusterOperation::ListNamespaces, json!(["dev", "prod", "ops"]))
            .respond(ClusterOperation::ListPods, json!([{ "name": "a" }, { "name": "b" }])),
    );
    let adapter = Arc::new(FakeAdapter::text("gemini", "looks healthy"));
    let dispatcher = builtin_dispatcher(registry_with(vec![adapter.clone()]), cluster.clone());

    let outcome = dispatcher
        .invoke(
            "intelligent_cluster_analysis",
            ToolArguments::new().with("namespace", "dev"),
        )
        .await;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    let result = outcome.result().unwrap();
    assert_eq!(result["analysis"], "looks healthy");
    assert!(result["cluster_info"].as_str().unwrap().contains("Pods in namespace: 2"));

    let prompt = &adapter.prompts()[0];
    assert!(prompt.contains("Total namespaces: 3"));
    assert!(prompt.contains("Current namespace: dev"));
    assert_eq!(cluster.calls().len(), 4);
}

#[tokio::test]
async fn cluster_analysis_reports_collaborator_failure() {
    let adapter = Arc::new(FakeAdapter::text("gemini", "unused"));
    let dispatcher = builtin_dispatcher(
        registry_with(vec![adapter.clone()]),
        Arc::new(FakeCluster::failing()),
    );

    let outcome = dispatcher
        .invoke("intelligent_cluster_analysis", ToolArguments::new())
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::CollaboratorFailure));
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn troubleshooting_tolerates_failing_cluster() {
    let adapter = Arc::new(FakeAdapter::text("gemini", "restart it"));
    let cluster = Arc::new(FakeCluster::failing().connected_to("https://api.example:6443"));
    let dispatcher = builtin_dispatcher(registry_with(vec![adapter.clone()]), cluster);

    let outcome = dispatcher
        .invoke(
            "get_troubleshooting_help",
            ToolArguments::new()
                .with("issue_description", "pods crash")
                .with("error_messages", "OOMKilled"),
        )
        .await;

    assert!(outcome.is_success(), "{:?}", outcome.error());
    assert_eq!(outcome.result().unwrap()["troubleshooting_help"], "restart it");
    let prompt = &adapter.prompts()[0];
    assert!(prompt.contains("Issue: pods crash"));
    assert!(prompt.contains("OOMKilled"));
    assert!(prompt.contains("Connected to OpenShift cluster."));
}

#[tokio::test]
async fn provider_listing_reports_effective_default() {
    let registry = registry_with(vec![
        Arc::new(FakeAdapter::text("openai", "a")),
        Arc::new(FakeAdapter::text("claude", "b")),
    ])
    .with_default("gemini");
    let dispatcher = builtin_dispatcher(registry, Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("get_llm_providers", ToolArguments::new())
        .await;

    let result = outcome.result().expect("success");
    assert_eq!(result["total_providers"], 2);
    assert_eq!(result["default_provider"], "openai");
    assert_eq!(result["available_providers"][1]["key"], "claude");
}

#[tokio::test]
async fn connection_test_probes_every_provider() {
    let registry = registry_with(vec![
        Arc::new(FakeAdapter::text("gemini", "hi")),
        Arc::new(FakeAdapter::new("claude", Reply::AuthFailure)),
    ]);
    let dispatcher = builtin_dispatcher(registry, Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("test_llm_connection", ToolArguments::new())
        .await;

    let results = &outcome.result().expect("success")["connection_results"];
    assert_eq!(results["gemini"]["status"], "ok");
    assert_eq!(results["claude"]["status"], "auth_failed");

    let single = dispatcher
        .invoke(
            "test_llm_connection",
            ToolArguments::new().with("provider", "missing"),
        )
        .await;
    assert_eq!(single.error_kind(), Some(ErrorKind::UnknownProvider));
}

#[tokio::test]
async fn outcome_serializes_envelope_fields() {
    let adapter = Arc::new(FakeAdapter::text("gemini", "hi"));
    let dispatcher =
        scenario_dispatcher(registry_with(vec![adapter]), Arc::new(FakeCluster::new()));

    let outcome = dispatcher
        .invoke("ask-ai", ToolArguments::new().with("question", "x"))
        .await;
    let value = serde_json::to_value(&outcome).expect("serialize");

    assert_eq!(value["tool"], "ask-ai");
    assert_eq!(value["success"], true);
    assert_eq!(value["provider"], "gemini");
    assert_eq!(value["model"], "gemini-model");
    assert!(value.get("error").is_none());
    assert!(value["elapsed_ms"].as_f64().unwrap() >= 0.0);
}
