//! Provider registry: the catalog of available valuation providers.
//!
//! The registry is assembled once at startup through [`RegistryBuilder`]
//! and immutable afterwards. Lookups are by provider code; selection
//! policy (which provider serves which asset) lives in assignments, not
//! here.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValuationError};
use crate::models::ProviderCode;
use crate::provider::ValuationProvider;

/// Discovery entry describing one registered provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub code: ProviderCode,
    pub name: String,
    /// Whether the provider computes values instead of fetching them.
    pub synthetic: bool,
}

/// Builder collecting providers before the registry is sealed.
#[derive(Default)]
pub struct RegistryBuilder {
    providers: HashMap<String, Arc<dyn ValuationProvider>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own code.
    ///
    /// A duplicate code is a startup configuration error, not a runtime
    /// condition, so it fails the build rather than replacing silently.
    pub fn register(mut self, provider: Arc<dyn ValuationProvider>) -> Result<Self> {
        let code = provider.code().to_string();
        if self.providers.contains_key(&code) {
            return Err(ValuationError::DuplicateProviderCode(code));
        }
        self.providers.insert(code, provider);
        Ok(self)
    }

    /// Seal the catalog.
    pub fn build(self) -> ProviderRegistry {
        info!("Provider registry sealed with {} providers", self.providers.len());
        ProviderRegistry {
            providers: self.providers,
        }
    }
}

/// Immutable catalog of valuation providers, keyed by code.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ValuationProvider>>,
}

impl ProviderRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a provider by code.
    pub fn get(&self, code: &ProviderCode) -> Result<Arc<dyn ValuationProvider>> {
        self.providers
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| ValuationError::ProviderNotFound(code.to_string()))
    }

    /// Whether a provider with this code is registered.
    pub fn contains(&self, code: &ProviderCode) -> bool {
        self.providers.contains_key(code.as_str())
    }

    /// Discovery listing, sorted by code for stable output.
    pub fn list(&self) -> Vec<ProviderInfo> {
        let mut infos: Vec<ProviderInfo> = self
            .providers
            .values()
            .map(|p| ProviderInfo {
                code: ProviderCode::new(p.code()),
                name: p.name().to_string(),
                synthetic: p.capabilities().synthetic,
            })
            .collect();
        infos.sort_by(|a, b| a.code.as_str().cmp(b.code.as_str()));
        infos
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
