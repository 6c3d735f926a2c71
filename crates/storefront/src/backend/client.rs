//! HTTP client for the hosted backend.
//!
//! Speaks the backend's three REST surfaces:
//!
//! - `/rest/v1/{table}` - table reads and writes (filters and embedded
//!   joins are expressed as query parameters)
//! - `/auth/v1/*` - password sign-in, sign-up, token revocation
//! - `/storage/v1/object/*` - object uploads and public URLs
//!
//! The client authenticates with the service key; row-level filters are
//! applied explicitly by each method.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use hoodies_core::{ProductId, Role, UserId};

use super::types::{
    AdminOrder, AuthSession, CustomerOrder, OrderInput, Product, ProductInput, Profile,
    ShippingAddress, SignUpOutcome,
};
use super::{BackendError, StoreBackend};
use crate::config::BackendConfig;

/// Client for the hosted backend's REST surface.
///
/// Cheaply cloneable; holds a shared connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base: String,
    api_key: String,
    bucket: String,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base: config.url.trim_end_matches('/').to_owned(),
                api_key: config.service_key.expose_secret().to_owned(),
                bucket: config.storage_bucket.clone(),
            }),
        }
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base)
    }

    /// Attach the service key headers to a request.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
    }

    /// Run a filtered select and decode the rows.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, BackendError> {
        let response = self
            .authed(self.inner.http.get(self.rest_url(table)))
            .query(query)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    /// Insert a row, discarding the representation.
    async fn insert_row(&self, table: &str, row: &impl Serialize) -> Result<(), BackendError> {
        let response = self
            .authed(self.inner.http.post(self.rest_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Update rows matching a single filter.
    async fn update_rows(
        &self,
        table: &str,
        filter: (&str, &str),
        row: &impl Serialize,
    ) -> Result<(), BackendError> {
        let response = self
            .authed(self.inner.http.patch(self.rest_url(table)))
            .query(&[filter])
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(response).await
    }

    /// Delete rows matching a single filter.
    async fn delete_rows(&self, table: &str, filter: (&str, &str)) -> Result<(), BackendError> {
        let response = self
            .authed(self.inner.http.delete(self.rest_url(table)))
            .query(&[filter])
            .send()
            .await?;
        Self::check(response).await
    }

    async fn read_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn check(response: reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(api_error(status, &body))
    }
}

#[async_trait]
impl StoreBackend for BackendClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let response = self
            .inner
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.inner.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Auth(error_message(&body)));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(AuthSession {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_owned()),
            access_token: token.access_token,
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .inner
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.inner.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Auth(error_message(&body)));
        }

        let signup: SignUpResponse = serde_json::from_str(&body)?;
        match (signup.access_token, signup.user) {
            (Some(access_token), Some(user)) => Ok(SignUpOutcome::SignedIn(AuthSession {
                user_id: user.id,
                email: user.email.unwrap_or_else(|| email.to_owned()),
                access_token,
            })),
            // Email confirmation pending: no session yet
            _ => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    #[instrument(skip(self, access_token))]
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::check(response).await
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn profile(&self, user: UserId) -> Result<Option<Profile>, BackendError> {
        let filter = format!("eq.{user}");
        let rows: Vec<Profile> = self
            .select("profiles", &[("select", "*"), ("id", &filter)])
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, shipping), fields(user = %user))]
    async fn update_profile_address(
        &self,
        user: UserId,
        shipping: &ShippingAddress,
    ) -> Result<(), BackendError> {
        let filter = format!("eq.{user}");
        self.update_rows("profiles", ("id", &filter), shipping).await
    }

    #[instrument(skip(self), fields(email = %email, role = role.as_str()))]
    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<u64, BackendError> {
        let filter = format!("eq.{email}");
        let response = self
            .authed(self.inner.http.patch(self.rest_url("profiles")))
            .query(&[("email", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "role": role.as_str() }))
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::read_rows(response).await?;
        Ok(rows.len() as u64)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        self.select(
            "products",
            &[("select", "*"), ("order", "created_at.desc")],
        )
        .await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let filter = format!("eq.{id}");
        let rows: Vec<Product> = self
            .select("products", &[("select", "*"), ("id", &filter)])
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn insert_product(&self, input: &ProductInput) -> Result<(), BackendError> {
        self.insert_row("products", input).await
    }

    #[instrument(skip(self, input), fields(id = %id))]
    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), BackendError> {
        let filter = format!("eq.{id}");
        self.update_rows("products", ("id", &filter), input).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        let filter = format!("eq.{id}");
        self.delete_rows("products", ("id", &filter)).await
    }

    #[instrument(skip(self, input), fields(product = %input.product_id))]
    async fn insert_order(&self, input: &OrderInput) -> Result<(), BackendError> {
        self.insert_row("orders", input).await
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn orders_for_user(&self, user: UserId) -> Result<Vec<CustomerOrder>, BackendError> {
        let filter = format!("eq.{user}");
        self.select(
            "orders",
            &[
                ("select", "*,products(name,price)"),
                ("user_id", &filter),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn all_orders(&self) -> Result<Vec<AdminOrder>, BackendError> {
        self.select(
            "orders",
            &[
                ("select", "*,products(name,price),profiles(email,full_name)"),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    #[instrument(skip(self, bytes), fields(file_name = %file_name))]
    async fn upload_product_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/storage/v1/object/{}/{file_name}",
            self.inner.base, self.inner.bucket
        );
        let response = self
            .authed(self.inner.http.post(&url))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;

        Ok(public_object_url(
            &self.inner.base,
            &self.inner.bucket,
            file_name,
        ))
    }
}

#[derive(Debug, serde::Deserialize)]
struct AuthUser {
    id: UserId,
    email: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, serde::Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<AuthUser>,
}

fn api_error(status: StatusCode, body: &str) -> BackendError {
    BackendError::Api {
        status: status.as_u16(),
        message: error_message(body),
    }
}

/// Extract the human-readable message from a backend error body.
///
/// The table API reports `{"message": ...}`, the auth endpoint
/// `{"msg": ...}` or `{"error_description": ...}`. Falls back to the raw
/// body, truncated.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
                return message.to_owned();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_owned()
    } else {
        trimmed.chars().take(200).collect()
    }
}

/// Public URL for an object in a public bucket.
fn public_object_url(base: &str, bucket: &str, path: &str) -> String {
    format!("{base}/storage/v1/object/public/{bucket}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_table_api() {
        let body = r#"{"code":"23505","message":"duplicate key value"}"#;
        assert_eq!(error_message(body), "duplicate key value");
    }

    #[test]
    fn test_error_message_auth_endpoint() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        // error_description wins over the bare error code
        assert_eq!(error_message(body), "Invalid login credentials");
    }

    #[test]
    fn test_error_message_plain_body() {
        assert_eq!(error_message("upstream timed out"), "upstream timed out");
    }

    #[test]
    fn test_error_message_empty_body() {
        assert_eq!(error_message(""), "request failed");
        assert_eq!(error_message("   "), "request failed");
    }

    #[test]
    fn test_error_message_truncates_long_bodies() {
        let body = "x".repeat(500);
        assert_eq!(error_message(&body).len(), 200);
    }

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url("https://backend.example", "product-images", "abc.png"),
            "https://backend.example/storage/v1/object/public/product-images/abc.png"
        );
    }
}
