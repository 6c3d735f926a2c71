//! CLI command implementations.

pub mod role;
pub mod seed;

use hoodies_storefront::backend::BackendClient;
use hoodies_storefront::config::StoreConfig;

/// Build a backend client from the environment.
pub fn backend_from_env() -> Result<BackendClient, Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    Ok(BackendClient::new(&config.backend))
}
