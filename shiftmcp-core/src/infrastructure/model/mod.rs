//! Model infrastructure module
//!
//! Completion providers behind one [`ProviderAdapter`] interface.
//!
//! # Structure
//! - `types` - Options, results and errors
//! - `traits` - ProviderAdapter trait
//! - `health` - Probe results
//! - `factory` - Provider factory for creating adapters
//! - `clients` - Individual adapter implementations
//! - `registry` - ProviderRegistry for selection and probing

pub mod clients;
pub mod factory;
pub mod health;
pub mod registry;
pub mod traits;
pub mod types;

pub use factory::ProviderFactory;
pub use health::{HealthStatus, ProviderHealth};
pub use registry::ProviderRegistry;
pub use traits::ProviderAdapter;
pub use types::{CompletionOptions, CompletionResult, ModelError, TokenUsage};
