//! Scheme to provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{MuxError, MuxResult};
use crate::provider::Provider;
use crate::url::is_valid_scheme;

/// Shared handle to a registered provider.
pub type SharedProvider = Arc<dyn Provider>;

/// Maps lowercase schemes to providers.
///
/// Registration takes the write lock only for the insert itself; lookups share the
/// read lock and hand out a cloned `Arc`, so a lookup never sees a partial insert.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, SharedProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` for `scheme`.
    ///
    /// Fails with [`MuxError::DuplicateScheme`] if the scheme is taken; the existing
    /// registration is left untouched.
    pub fn register(&self, scheme: &str, provider: SharedProvider) -> MuxResult<()> {
        let key = normalize_scheme(scheme)?;
        let mut providers = self.providers.write();
        if providers.contains_key(&key) {
            return Err(MuxError::DuplicateScheme(key));
        }
        debug!(scheme = %key, "Provider registered");
        providers.insert(key, provider);
        Ok(())
    }

    /// Register the provider bound to `target` under `alias` as well.
    pub fn register_alias(&self, alias: &str, target: &str) -> MuxResult<()> {
        let provider = self.lookup(target)?;
        self.register(alias, provider)
    }

    /// Find the provider for `scheme`.
    pub fn lookup(&self, scheme: &str) -> MuxResult<SharedProvider> {
        let key = scheme.to_ascii_lowercase();
        self.providers
            .read()
            .get(&key)
            .cloned()
            .ok_or(MuxError::UnsupportedScheme(key))
    }

    /// Check whether `scheme` has a provider.
    pub fn contains(&self, scheme: &str) -> bool {
        self.providers
            .read()
            .contains_key(&scheme.to_ascii_lowercase())
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.providers.read().keys().cloned().collect();
        schemes.sort();
        schemes
    }

    /// Number of registered schemes.
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

fn normalize_scheme(scheme: &str) -> MuxResult<String> {
    if !is_valid_scheme(scheme) {
        return Err(MuxError::config(format!(
            "invalid provider scheme {:?}",
            scheme
        )));
    }
    Ok(scheme.to_ascii_lowercase())
}
