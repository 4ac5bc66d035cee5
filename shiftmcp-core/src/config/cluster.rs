use serde::{Deserialize, Serialize};

/// Connection parameters for the cluster collaborator.
///
/// ```toml
/// [cluster]
/// url = "https://api.ocp.example.com:6443"
/// token = "${OPENSHIFT_TOKEN}"
/// verify_ssl = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    pub url: String,
    /// Credential reference: environment variable name or `${VAR}` expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_verify_ssl() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawClusterConfig {
    pub(super) url: Option<String>,
    pub(super) token: Option<String>,
    pub(super) verify_ssl: Option<bool>,
}
