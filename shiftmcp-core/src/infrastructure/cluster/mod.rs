//! Cluster collaborator
//!
//! The dispatcher reaches the cluster only through [`ClusterOperations`].
//! [`RestClusterClient`] is a thin bearer-token pass-through to the
//! Kubernetes/OpenShift REST API; [`DisconnectedCluster`] stands in when no
//! cluster is configured.

mod error;
mod rest;
mod summary;

pub use error::ClusterError;
pub use rest::RestClusterClient;

use crate::domain::types::{ClusterOperation, ToolArguments};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait ClusterOperations: Send + Sync {
    /// Run one resource query or mutation and return its structured result.
    async fn execute(
        &self,
        operation: ClusterOperation,
        args: &ToolArguments,
    ) -> Result<Value, ClusterError>;

    /// Short description for prompt context (e.g. the API URL).
    fn describe(&self) -> Option<String> {
        None
    }
}

/// Collaborator used when no cluster connection is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedCluster;

#[async_trait]
impl ClusterOperations for DisconnectedCluster {
    async fn execute(
        &self,
        _operation: ClusterOperation,
        _args: &ToolArguments,
    ) -> Result<Value, ClusterError> {
        Err(ClusterError::NotConnected)
    }
}
