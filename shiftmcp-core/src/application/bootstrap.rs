//! Wire a [`Dispatcher`] from startup configuration.

use super::dispatcher::Dispatcher;
use super::tooling::{CatalogError, ToolCatalog};
use crate::config::AppConfig;
use crate::infrastructure::audit::JsonLinesSink;
use crate::infrastructure::cluster::{
    ClusterError, ClusterOperations, DisconnectedCluster, RestClusterClient,
};
use crate::infrastructure::model::{ModelError, ProviderRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to build tool catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to build provider registry: {0}")]
    Providers(#[from] ModelError),
    #[error("failed to build cluster client: {0}")]
    Cluster(#[from] ClusterError),
    #[error("failed to open audit log {path}: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build the catalog, provider registry, cluster collaborator and optional
/// audit sink described by `config`.
pub async fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher, BootstrapError> {
    let catalog = ToolCatalog::with_builtin_tools()?;
    let registry =
        ProviderRegistry::from_configs(&config.providers, config.default_provider.as_deref())?;

    let cluster: Arc<dyn ClusterOperations> = match &config.cluster {
        Some(cluster) => Arc::new(RestClusterClient::from_config(cluster, config.timeout)?),
        None => {
            warn!("No cluster configured; cluster tools will report CollaboratorFailure");
            Arc::new(DisconnectedCluster)
        }
    };

    let mut dispatcher = Dispatcher::new(catalog, registry, cluster)
        .with_timeout(config.timeout)
        .with_system_prompt(config.system_prompt.as_str());

    if let Some(path) = &config.audit_log {
        let sink = JsonLinesSink::open(path)
            .await
            .map_err(|source| BootstrapError::AuditLog {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "Writing invocation outcomes to audit log");
        dispatcher = dispatcher.with_sink(Arc::new(sink));
    }

    info!(
        tools = dispatcher.catalog().len(),
        providers = dispatcher.registry().len(),
        "Dispatcher ready"
    );
    Ok(dispatcher)
}
