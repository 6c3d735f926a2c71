//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::StoreBackend;
use crate::config::StoreConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the injected hosted-backend implementation.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    store: Arc<dyn StoreBackend>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Hosted backend implementation (real client or test fake)
    #[must_use]
    pub fn new(config: StoreConfig, store: Arc<dyn StoreBackend>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the hosted backend.
    #[must_use]
    pub fn store(&self) -> &dyn StoreBackend {
        &*self.inner.store
    }
}
