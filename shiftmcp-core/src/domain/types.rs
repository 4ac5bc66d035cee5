//! Tool descriptors and the typed handler references they carry.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::fmt;

/// Arguments supplied with an invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; only objects are valid argument maps.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            Value::Null => Some(Self::default()),
            _ => None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Looks up a value, treating an explicit `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

/// Semantic type of a tool parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// A string restricted to the listed values
    Enum(Vec<String>),
    Object,
}

impl ParamKind {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Enum(allowed) => value
                .as_str()
                .is_some_and(|v| allowed.iter().any(|a| a == v)),
            ParamKind::Object => value.is_object(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String | ParamKind::Enum(_) => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
        }
    }

    fn schema(&self) -> Value {
        match self {
            ParamKind::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
            other => json!({ "type": other.as_str() }),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Enum(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
            other => f.write_str(other.as_str()),
        }
    }
}

/// One parameter in a tool's argument schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            required: false,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Object)
    }

    pub fn one_of<I, S>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ParamKind::Enum(allowed.into_iter().map(Into::into).collect()),
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Cluster resource queries and mutations served by the cluster collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOperation {
    ListNamespaces,
    ListApplications,
    ListPods,
    ListServices,
    ListRoutes,
    ListConfigMaps,
    ListSecrets,
    GetPodLogs,
    GetResourceUsage,
    ScaleDeployment,
    DeletePod,
    CreateNamespace,
    DeleteNamespace,
}

impl ClusterOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterOperation::ListNamespaces => "list_namespaces",
            ClusterOperation::ListApplications => "list_applications",
            ClusterOperation::ListPods => "list_pods",
            ClusterOperation::ListServices => "list_services",
            ClusterOperation::ListRoutes => "list_routes",
            ClusterOperation::ListConfigMaps => "list_configmaps",
            ClusterOperation::ListSecrets => "list_secrets",
            ClusterOperation::GetPodLogs => "get_pod_logs",
            ClusterOperation::GetResourceUsage => "get_resource_usage",
            ClusterOperation::ScaleDeployment => "scale_deployment",
            ClusterOperation::DeletePod => "delete_pod",
            ClusterOperation::CreateNamespace => "create_namespace",
            ClusterOperation::DeleteNamespace => "delete_namespace",
        }
    }

    /// Whether the operation changes cluster state. Mutations are not safe to
    /// repeat blindly after a timeout.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ClusterOperation::ScaleDeployment
                | ClusterOperation::DeletePod
                | ClusterOperation::CreateNamespace
                | ClusterOperation::DeleteNamespace
        )
    }
}

impl fmt::Display for ClusterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt-building strategies for completion tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTask {
    /// Free-form question with optional caller context
    Ask,
    /// Summarise cluster facts and ask for a health assessment
    ClusterAnalysis,
    /// Ask for troubleshooting steps for a described issue
    Troubleshoot,
}

/// Introspection over the provider registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaOperation {
    ListProviders,
    ProbeProviders,
}

/// Typed reference to the code that serves a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHandler {
    Cluster(ClusterOperation),
    Completion(CompletionTask),
    Meta(MetaOperation),
}

impl ToolHandler {
    pub fn category(&self) -> ToolCategory {
        match self {
            ToolHandler::Cluster(_) => ToolCategory::ClusterOperation,
            ToolHandler::Completion(_) => ToolCategory::CompletionOperation,
            ToolHandler::Meta(_) => ToolCategory::Meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    ClusterOperation,
    CompletionOperation,
    Meta,
}

/// A named, schema-described unit of work.
///
/// The category is derived from the handler variant so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            handler,
        }
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn handler(&self) -> ToolHandler {
        self.handler
    }

    pub fn category(&self) -> ToolCategory {
        self.handler.category()
    }

    /// JSON Schema of the arguments, as advertised to callers.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            let mut schema = param.kind.schema();
            if !param.description.is_empty() {
                schema["description"] = Value::String(param.description.clone());
            }
            if let Some(default) = &param.default {
                schema["default"] = default.clone();
            }
            properties.insert(param.name.clone(), schema);
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ToolDescriptor", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("inputSchema", &self.input_schema())?;
        state.end()
    }
}
