//! Global application state.
//!
//! Used for access to common resources such as the product store.

use super::config::Config;
use crate::feature::product::product_store::ProductStore;
use axum::extract::FromRef;

/// Global application state.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    store: ProductStore,
    config: Config,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(store: ProductStore, config: Config) -> Self {
        Self { store, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
