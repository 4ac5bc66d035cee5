//! # shiftmcp-core
//!
//! Tool dispatch engine and multi-provider completion orchestration.
//!
//! A [`Dispatcher`] owns a read-only [`ToolCatalog`] and [`ProviderRegistry`].
//! Every call to [`Dispatcher::invoke`] resolves a tool by name, validates the
//! arguments against its descriptor, runs the handler (a cluster operation, a
//! completion through one of the registered providers, or a meta query) and
//! returns an [`InvocationOutcome`]. Failures never escape as errors; they are
//! reported inside the outcome with an [`ErrorKind`].

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::{BootstrapError, build_dispatcher};
pub use application::dispatcher::Dispatcher;
pub use application::tooling::{CatalogError, ToolCatalog};
pub use config::{AppConfig, ConfigError, ProviderConfig};
pub use domain::outcome::{ErrorKind, InvocationOutcome, ProviderUse, ToolFailure};
pub use domain::types::{
    ClusterOperation, CompletionTask, MetaOperation, ParamKind, ParamSpec, ToolArguments,
    ToolCategory, ToolDescriptor, ToolHandler,
};
pub use infrastructure::{audit, cluster, model};
pub use infrastructure::model::{ProviderAdapter, ProviderHealth, ProviderRegistry};
