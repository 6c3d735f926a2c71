//! Integration tests for Under the Hoodies.
//!
//! Each test boots the real router on an ephemeral port with the in-memory
//! backend injected, then drives it over HTTP with a cookie-carrying
//! client. No external services are involved.
//!
//! # Test Categories
//!
//! - `auth` - Sign-in, sign-up, sign-out
//! - `guards` - Route gating for anonymous, customer, and admin visitors
//! - `order_flow` - Browse -> detail -> checkout -> dashboard
//! - `checkout_gaps` - The documented non-atomic checkout behaviors
//! - `admin_products` - Product CRUD and image upload

use std::net::IpAddr;
use std::sync::Arc;

use secrecy::SecretString;

use hoodies_storefront::backend::MemoryBackend;
use hoodies_storefront::config::{BackendConfig, StoreConfig};
use hoodies_storefront::routes;
use hoodies_storefront::state::AppState;

/// A running storefront bound to an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    pub backend: Arc<MemoryBackend>,
}

impl TestApp {
    /// Boot the app with a fresh, empty backend.
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(MemoryBackend::new())).await
    }

    /// Boot the app against a prepared backend.
    pub async fn spawn_with(backend: Arc<MemoryBackend>) -> Self {
        let state = AppState::new(test_config(), backend.clone());
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// A client with a cookie jar and redirects disabled, so tests can
    /// assert on the redirects themselves.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in through the real form endpoint, storing the session cookie
    /// on the client.
    pub async fn sign_in(&self, client: &reqwest::Client, email: &str, password: &str) {
        let response = client
            .post(self.url("/auth/signin"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Sign-in request failed");

        assert!(
            response.status().is_redirection(),
            "sign-in did not redirect: {}",
            response.status()
        );
        assert_eq!(location(&response), "/dashboard", "sign-in rejected");
    }
}

fn test_config() -> StoreConfig {
    StoreConfig {
        host: "127.0.0.1".parse::<IpAddr>().expect("valid host"),
        port: 0,
        base_url: "http://localhost".to_owned(),
        backend: BackendConfig {
            url: "http://backend.invalid".to_owned(),
            service_key: SecretString::from("unused-by-the-memory-backend"),
            storage_bucket: "product-images".to_owned(),
        },
        sentry_dsn: None,
    }
}

/// The `Location` header of a redirect response.
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
