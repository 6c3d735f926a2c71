//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::Nav;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
}

/// Display the home page.
pub async fn home(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    HomeTemplate {
        nav: Nav::for_user(user.as_ref()),
    }
}
