//! Admin panel route handlers.
//!
//! Every handler takes the [`RequireAdmin`] guard: unauthenticated or
//! non-admin visitors are redirected before any admin data is fetched.

pub mod orders;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Nav;

/// Admin landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub nav: Nav,
}

/// Display the admin landing page.
pub async fn index(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    AdminIndexTemplate {
        nav: Nav::for_user(Some(&admin)),
    }
}
