//! Provider registry and selector

use super::factory::ProviderFactory;
use super::health::ProviderHealth;
use super::traits::ProviderAdapter;
use super::types::ModelError;
use crate::config::ProviderConfig;
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Holds every configured adapter in configuration order.
///
/// Adapters and the default key are fixed once the registry is handed to a
/// dispatcher. The health cache is the only mutable state; each probe
/// replaces exactly one entry under a short write lock.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    index: HashMap<String, usize>,
    default_key: Option<String>,
    health: RwLock<HashMap<String, ProviderHealth>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every config through [`ProviderFactory`].
    pub fn from_configs(
        configs: &[ProviderConfig],
        default_key: Option<&str>,
    ) -> Result<Self, ModelError> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(ProviderFactory::create(config)?)?;
            debug!(
                provider = config.id.as_str(),
                kind = %config.kind(),
                model = config.model.as_str(),
                "Registered provider"
            );
        }
        if let Some(key) = default_key {
            registry.default_key = Some(key.to_string());
        }
        info!(
            providers = registry.len(),
            default = registry.default_key().unwrap_or("-"),
            "Provider registry ready"
        );
        Ok(registry)
    }

    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> Result<(), ModelError> {
        let key = adapter.key().to_string();
        if self.index.contains_key(&key) {
            return Err(ModelError::DuplicateProvider { provider: key });
        }
        self.index.insert(key, self.adapters.len());
        self.adapters.push(adapter);
        Ok(())
    }

    /// Set the configured default. The key does not have to be registered;
    /// selection falls back to the first provider when it is not.
    pub fn with_default(mut self, key: impl Into<String>) -> Self {
        self.default_key = Some(key.into());
        self
    }

    /// Resolve the adapter for a request.
    ///
    /// An explicit key must be registered. Otherwise the configured default
    /// is used when registered, then the first provider in configuration
    /// order. No health check is performed.
    pub fn select(&self, requested: Option<&str>) -> Result<Arc<dyn ProviderAdapter>, ModelError> {
        if let Some(key) = requested {
            return self
                .get(key)
                .ok_or_else(|| ModelError::provider_not_found(key));
        }

        if let Some(adapter) = self.default_key.as_deref().and_then(|key| self.get(key)) {
            return Ok(adapter);
        }

        self.adapters
            .first()
            .cloned()
            .ok_or(ModelError::NoProviderConfigured)
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.index.get(key).map(|&i| Arc::clone(&self.adapters[i]))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in configuration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.adapters.iter().map(|a| a.key())
    }

    pub fn default_key(&self) -> Option<&str> {
        self.default_key.as_deref()
    }

    /// The key `select(None)` would resolve to.
    pub fn effective_default(&self) -> Option<&str> {
        self.default_key
            .as_deref()
            .filter(|key| self.contains(key))
            .or_else(|| self.adapters.first().map(|a| a.key()))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Probe one provider and cache the result.
    pub async fn probe(&self, key: &str) -> Result<ProviderHealth, ModelError> {
        let adapter = self
            .get(key)
            .ok_or_else(|| ModelError::provider_not_found(key))?;
        let health = adapter.probe().await;
        self.record(key, &health);
        Ok(health)
    }

    /// Probe every provider concurrently. Every registered key gets an entry;
    /// one provider failing never affects the others.
    pub async fn probe_all(&self) -> BTreeMap<String, ProviderHealth> {
        let probes = self.adapters.iter().map(|adapter| async move {
            let health = adapter.probe().await;
            (adapter.key().to_string(), health)
        });

        let results = join_all(probes).await;
        for (key, health) in &results {
            self.record(key, health);
        }
        results.into_iter().collect()
    }

    /// Result of the most recent probe of `key`, if any.
    pub fn last_health(&self, key: &str) -> Option<ProviderHealth> {
        let cache = self.health.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(key).cloned()
    }

    fn record(&self, key: &str, health: &ProviderHealth) {
        if !health.is_ok() {
            warn!(
                provider = key,
                status = ?health.status,
                detail = health.detail.as_deref().unwrap_or(""),
                "Provider probe failed"
            );
        }
        let mut cache = self.health.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(key.to_string(), health.clone());
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.keys().collect::<Vec<_>>())
            .field("default_key", &self.default_key)
            .finish()
    }
}
