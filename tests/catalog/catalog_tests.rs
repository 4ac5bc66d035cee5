// Catalog tests - registration, lookup and listing

use shiftmcp_core::{
    CatalogError, ClusterOperation, CompletionTask, ParamSpec, ToolCatalog, ToolCategory,
    ToolDescriptor, ToolHandler,
};

fn list_namespaces() -> ToolDescriptor {
    ToolDescriptor::new(
        "list-namespaces",
        "List all namespaces",
        ToolHandler::Cluster(ClusterOperation::ListNamespaces),
    )
}

fn ask_ai() -> ToolDescriptor {
    ToolDescriptor::new(
        "ask-ai",
        "Ask a question",
        ToolHandler::Completion(CompletionTask::Ask),
    )
    .param(ParamSpec::string("question").required())
    .param(ParamSpec::string("provider"))
}

#[test]
fn lookup_returns_registered_descriptor() {
    let mut catalog = ToolCatalog::new();
    catalog.register(list_namespaces()).expect("register");
    catalog.register(ask_ai()).expect("register");

    let found = catalog.lookup("ask-ai").expect("lookup");
    assert_eq!(found.name(), "ask-ai");
    assert_eq!(found.category(), ToolCategory::CompletionOperation);

    let found = catalog.lookup("list-namespaces").expect("lookup");
    assert_eq!(found.category(), ToolCategory::ClusterOperation);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut catalog = ToolCatalog::new();
    catalog.register(list_namespaces()).expect("first registration");

    let err = catalog.register(list_namespaces()).unwrap_err();
    assert_eq!(
        err,
        CatalogError::DuplicateTool {
            name: "list-namespaces".into()
        }
    );
    assert_eq!(catalog.len(), 1);
}

#[test]
fn unknown_lookup_fails() {
    let catalog = ToolCatalog::new();
    assert!(matches!(
        catalog.lookup("missing"),
        Err(CatalogError::UnknownTool { name }) if name == "missing"
    ));
}

#[test]
fn list_preserves_registration_order_and_restarts() {
    let mut catalog = ToolCatalog::new();
    catalog.register(ask_ai()).expect("register");
    catalog.register(list_namespaces()).expect("register");

    let first: Vec<&str> = catalog.list().map(ToolDescriptor::name).collect();
    let second: Vec<&str> = catalog.list().map(ToolDescriptor::name).collect();
    assert_eq!(first, vec!["ask-ai", "list-namespaces"]);
    assert_eq!(first, second);

    let iter = catalog.list();
    assert_eq!(iter.clone().count(), iter.count());
}

#[test]
fn descriptor_serializes_input_schema() {
    let value = serde_json::to_value(ask_ai()).expect("serialize");
    assert_eq!(value["name"], "ask-ai");
    assert_eq!(value["category"], "completion_operation");
    assert_eq!(value["inputSchema"]["type"], "object");
    assert_eq!(value["inputSchema"]["required"], serde_json::json!(["question"]));
    assert_eq!(
        value["inputSchema"]["properties"]["provider"]["type"],
        "string"
    );
}

#[test]
fn builtin_catalog_covers_cluster_completion_and_meta_tools() {
    let catalog = ToolCatalog::with_builtin_tools().expect("builtin tools");

    for name in [
        "list_namespaces",
        "scale_deployment",
        "ask_llm",
        "intelligent_cluster_analysis",
        "get_troubleshooting_help",
        "get_llm_providers",
        "test_llm_connection",
    ] {
        assert!(catalog.contains(name), "missing builtin tool {name}");
    }

    let meta = catalog
        .list()
        .filter(|t| t.category() == ToolCategory::Meta)
        .count();
    assert_eq!(meta, 2);
}
