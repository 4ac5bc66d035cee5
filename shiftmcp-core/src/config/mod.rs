pub mod app;
pub mod cluster;
mod env;
pub mod error;
pub mod loader;
pub mod provider;
pub mod secret;

pub use crate::constants::CONFIG_PATH;

pub use app::AppConfig;
pub use cluster::ClusterConfig;
pub use error::ConfigError;
pub use provider::{ProviderConfig, ProviderKind};
pub use secret::{Credential, resolve_secret};
