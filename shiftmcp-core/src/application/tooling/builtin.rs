//! Tools shipped with the dispatcher.

use super::catalog::ToolCatalog;
use super::error::CatalogError;
use crate::domain::types::{
    ClusterOperation, CompletionTask, MetaOperation, ParamSpec, ToolDescriptor, ToolHandler,
};

const DEFAULT_TAIL_LINES: i64 = 100;

impl ToolCatalog {
    /// Catalog holding every built-in cluster, completion and meta tool.
    pub fn with_builtin_tools() -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for descriptor in builtin_tools() {
            catalog.register(descriptor)?;
        }
        Ok(catalog)
    }
}

fn namespace() -> ParamSpec {
    ParamSpec::string("namespace")
        .required()
        .describe("Namespace name")
}

fn provider() -> ParamSpec {
    ParamSpec::string("provider").describe("Provider to use (gemini, openai, claude, custom)")
}

fn cluster(name: &str, description: &str, op: ClusterOperation) -> ToolDescriptor {
    ToolDescriptor::new(name, description, ToolHandler::Cluster(op))
}

pub fn builtin_tools() -> Vec<ToolDescriptor> {
    use ClusterOperation as Op;

    vec![
        cluster(
            Op::ListNamespaces.as_str(),
            "List all namespaces in the cluster",
            Op::ListNamespaces,
        ),
        cluster(
            Op::ListApplications.as_str(),
            "List deployments, stateful sets and daemon sets in a namespace",
            Op::ListApplications,
        )
        .param(namespace()),
        cluster(Op::ListPods.as_str(), "List pods in a namespace", Op::ListPods)
            .param(namespace()),
        cluster(
            Op::ListServices.as_str(),
            "List services in a namespace",
            Op::ListServices,
        )
        .param(namespace()),
        cluster(Op::ListRoutes.as_str(), "List routes in a namespace", Op::ListRoutes)
            .param(namespace()),
        cluster(
            Op::ListConfigMaps.as_str(),
            "List configmaps in a namespace",
            Op::ListConfigMaps,
        )
        .param(namespace()),
        cluster(
            Op::ListSecrets.as_str(),
            "List secrets in a namespace (names and keys only)",
            Op::ListSecrets,
        )
        .param(namespace()),
        cluster(
            Op::GetPodLogs.as_str(),
            "Get logs from a specific pod",
            Op::GetPodLogs,
        )
        .param(namespace())
        .param(ParamSpec::string("pod_name").required().describe("Pod name"))
        .param(
            ParamSpec::integer("tail_lines")
                .describe("Number of lines to retrieve")
                .default_value(DEFAULT_TAIL_LINES),
        ),
        cluster(
            Op::GetResourceUsage.as_str(),
            "Get resource requests and limits for pods in a namespace",
            Op::GetResourceUsage,
        )
        .param(namespace()),
        cluster(
            Op::ScaleDeployment.as_str(),
            "Scale a deployment to a specific number of replicas",
            Op::ScaleDeployment,
        )
        .param(namespace())
        .param(
            ParamSpec::string("deployment_name")
                .required()
                .describe("Deployment name"),
        )
        .param(
            ParamSpec::integer("replicas")
                .required()
                .describe("Number of replicas"),
        ),
        cluster(Op::DeletePod.as_str(), "Delete a specific pod", Op::DeletePod)
            .param(namespace())
            .param(ParamSpec::string("pod_name").required().describe("Pod name")),
        cluster(
            Op::CreateNamespace.as_str(),
            "Create a new namespace",
            Op::CreateNamespace,
        )
        .param(ParamSpec::string("name").required().describe("Namespace name"))
        .param(ParamSpec::object("labels").describe("Labels to apply")),
        cluster(
            Op::DeleteNamespace.as_str(),
            "Delete a namespace",
            Op::DeleteNamespace,
        )
        .param(ParamSpec::string("name").required().describe("Namespace name")),
        ToolDescriptor::new(
            "ask_llm",
            "Ask a completion provider a question about OpenShift management",
            ToolHandler::Completion(CompletionTask::Ask),
        )
        .param(
            ParamSpec::string("question")
                .required()
                .describe("Your question about OpenShift management"),
        )
        .param(ParamSpec::string("context").describe("Additional context or cluster information"))
        .param(provider()),
        ToolDescriptor::new(
            "intelligent_cluster_analysis",
            "Analyze cluster health and provide recommendations",
            ToolHandler::Completion(CompletionTask::ClusterAnalysis),
        )
        .param(ParamSpec::string("namespace").describe("Namespace to analyze (optional)"))
        .param(provider()),
        ToolDescriptor::new(
            "get_troubleshooting_help",
            "Get troubleshooting help for an OpenShift issue",
            ToolHandler::Completion(CompletionTask::Troubleshoot),
        )
        .param(
            ParamSpec::string("issue_description")
                .required()
                .describe("Description of the issue you're facing"),
        )
        .param(ParamSpec::string("error_messages").describe("Any error messages or logs"))
        .param(provider()),
        ToolDescriptor::new(
            "get_llm_providers",
            "List configured completion providers and the default",
            ToolHandler::Meta(MetaOperation::ListProviders),
        ),
        ToolDescriptor::new(
            "test_llm_connection",
            "Probe connectivity to one or all completion providers",
            ToolHandler::Meta(MetaOperation::ProbeProviders),
        )
        .param(ParamSpec::string("provider").describe("Specific provider to test (optional)")),
    ]
}
