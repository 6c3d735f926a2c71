//! Hosted backend access.
//!
//! # Architecture
//!
//! All persistence, authentication, and file storage are delegated to the
//! hosted backend (table API + auth endpoint + object storage). Nothing in
//! this application talks to it directly; everything goes through the
//! [`StoreBackend`] trait so the whole service can run against the real
//! HTTP client in production and an in-memory fake in tests.
//!
//! - [`BackendClient`] - reqwest client for the backend's REST surface
//! - [`MemoryBackend`] - in-memory fake with the same observable behavior
//!
//! # Example
//!
//! ```rust,ignore
//! use hoodies_storefront::backend::{BackendClient, StoreBackend};
//!
//! let client = BackendClient::new(&config.backend);
//!
//! let products = client.products().await?;
//! let product = client.product(ProductId::new(3)).await?;
//! ```

pub mod client;
pub mod memory;
pub mod types;

pub use client::BackendClient;
pub use memory::MemoryBackend;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use hoodies_core::{ProductId, Role, UserId};

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the operation. The message is the backend's
    /// human-readable explanation and is safe to show to the user.
    #[error("{message}")]
    Api {
        /// HTTP status code of the rejection.
        status: u16,
        /// Backend-provided message.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Sign-in or sign-up was rejected by the auth endpoint.
    #[error("{0}")]
    Auth(String),
}

/// Table, auth, and storage operations against the hosted backend.
///
/// One method per operation the application performs; callers never build
/// queries themselves. Orders are append-only, and `delete_product` does
/// not cascade to order rows.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Authenticate with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    /// Create an account. The backend creates the matching profile row.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError>;

    /// Revoke an access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Fetch a user's profile row.
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, BackendError>;

    /// Persist shipping address fields onto a user's profile.
    async fn update_profile_address(
        &self,
        user: UserId,
        shipping: &ShippingAddress,
    ) -> Result<(), BackendError>;

    /// Set the role on every profile matching the email. Returns the number
    /// of rows updated.
    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<u64, BackendError>;

    /// All products, newest first.
    async fn products(&self) -> Result<Vec<Product>, BackendError>;

    /// One product by id, or `None` if no row matches.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError>;

    /// Insert a new product row.
    async fn insert_product(&self, input: &ProductInput) -> Result<(), BackendError>;

    /// Update an existing product row.
    async fn update_product(&self, id: ProductId, input: &ProductInput)
    -> Result<(), BackendError>;

    /// Delete a product row. Existing orders referencing it are untouched.
    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError>;

    /// Insert an order row.
    async fn insert_order(&self, input: &OrderInput) -> Result<(), BackendError>;

    /// A user's own orders joined with product name and price, newest first.
    async fn orders_for_user(&self, user: UserId) -> Result<Vec<CustomerOrder>, BackendError>;

    /// Every order joined with product and customer profile, newest first.
    async fn all_orders(&self) -> Result<Vec<AdminOrder>, BackendError>;

    /// Store an image in the product bucket and return its public URL.
    async fn upload_product_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = BackendError::Api {
            status: 409,
            message: "duplicate key value violates unique constraint".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_auth_error_display() {
        let err = BackendError::Auth("Invalid login credentials".to_owned());
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
