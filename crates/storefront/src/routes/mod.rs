//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /shop                   - Product listing
//! GET  /shop/{id}              - Product detail (unknown id renders not-found)
//! POST /shop/{id}/order        - "Order Now": validate user + size, go to checkout
//!
//! # Order workflow
//! GET  /checkout               - Order summary + shipping form (requires user + intent)
//! POST /checkout               - Persist address to profile, insert order
//! GET  /dashboard              - Own order history (requires user)
//!
//! # Auth
//! GET  /auth                   - Sign-in / sign-up page
//! POST /auth/signin            - Password sign-in via the hosted backend
//! POST /auth/signup            - Account creation via the hosted backend
//! POST /auth/signout           - Revoke token, clear session
//!
//! # Admin (requires admin role)
//! GET  /admin                  - Admin landing page
//! GET  /admin/products         - Product form + list
//! POST /admin/products         - Create/update product (multipart, optional image)
//! POST /admin/products/{id}/delete - Delete product (orders keep their rows)
//! GET  /admin/orders           - All orders joined with product and customer
//! ```

pub mod admin;
pub mod auth;
pub mod checkout;
pub mod dashboard;
pub mod home;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::page))
        .route("/signin", post(auth::sign_in))
        .route("/signup", post(auth::sign_up))
        .route("/signout", post(auth::sign_out))
}

/// Create the catalog routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shop::index))
        .route("/{id}", get(shop::show))
        .route("/{id}/order", post(shop::order))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route(
            "/products",
            get(admin::products::index).post(admin::products::save),
        )
        .route("/products/{id}/delete", post(admin::products::delete))
        .route("/orders", get(admin::orders::index))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/shop", shop_routes())
        // Order workflow
        .route("/checkout", get(checkout::page).post(checkout::submit))
        .route("/dashboard", get(dashboard::index))
        // Auth
        .nest("/auth", auth_routes())
        // Admin panel
        .nest("/admin", admin_routes())
}

/// Build the full application with sessions, tracing, and static assets.
///
/// Kept separate from `main` so tests can run the real router against an
/// injected backend.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
