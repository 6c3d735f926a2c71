//! Authentication route handlers.
//!
//! Sign-in, sign-up, and sign-out all delegate to the hosted backend's
//! auth endpoint; the only local state is the cookie session holding the
//! resolved identity. The admin flag is resolved once at sign-in (failing
//! closed to non-admin) and cached for navigation rendering.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use hoodies_core::UserId;

use crate::backend::{AuthSession, SignUpOutcome};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::{CurrentUser, Nav, session_keys};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Query parameters for error/notice display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in / sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub notice: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the sign-in page. Signed-in users go straight to the dashboard.
pub async fn page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    AuthTemplate {
        nav: Nav::signed_out(),
        error: query.error,
        notice: notice_text(query.notice.as_deref()),
    }
    .into_response()
}

/// Handle sign-in form submission.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return redirect_with_error("Email and password are required");
    }

    match state.store().sign_in(email, &form.password).await {
        Ok(auth) => establish_session(&state, &session, auth).await,
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            redirect_with_error(&e.to_string())
        }
    }
}

/// Handle sign-up form submission.
///
/// The backend creates the account and its profile row. Depending on its
/// confirmation settings it either issues a session immediately or asks
/// the user to confirm their email first.
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return redirect_with_error("Email and password are required");
    }

    match state
        .store()
        .sign_up(email, &form.password, form.full_name.trim())
        .await
    {
        Ok(SignUpOutcome::SignedIn(auth)) => establish_session(&state, &session, auth).await,
        Ok(SignUpOutcome::ConfirmationRequired) => {
            Redirect::to("/auth?notice=confirm_email").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-up failed");
            redirect_with_error(&e.to_string())
        }
    }
}

/// Handle sign-out.
///
/// Revokes the backend token (best effort) and destroys the session.
pub async fn sign_out(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        && let Err(e) = state.store().sign_out(&user.access_token).await
    {
        tracing::warn!(error = %e, "Failed to revoke backend access token");
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/").into_response()
}

// =============================================================================
// Helpers
// =============================================================================

/// Resolve the admin flag for a user, failing closed.
async fn resolve_admin(state: &AppState, user: UserId) -> bool {
    match state.store().profile(user).await {
        Ok(Some(profile)) => profile.role().is_admin(),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(user = %user, error = %e, "Role lookup failed; treating as non-admin");
            false
        }
    }
}

/// Store the authenticated identity in the session and head to the dashboard.
async fn establish_session(state: &AppState, session: &Session, auth: AuthSession) -> Response {
    let is_admin = resolve_admin(state, auth.user_id).await;

    let current_user = CurrentUser {
        id: auth.user_id,
        email: auth.email,
        is_admin,
        access_token: auth.access_token,
    };

    if let Err(e) = set_current_user(session, &current_user).await {
        tracing::error!("Failed to set session: {}", e);
        return redirect_with_error("Could not start a session, please try again");
    }

    Redirect::to("/dashboard").into_response()
}

fn redirect_with_error(message: &str) -> Response {
    let location = format!("/auth?error={}", urlencoding::encode(message));
    Redirect::to(&location).into_response()
}

/// Map notice codes carried in the query string to display text.
fn notice_text(code: Option<&str>) -> Option<String> {
    match code {
        Some("signin_required") => Some("Please sign in to continue".to_owned()),
        Some("confirm_email") => {
            Some("Check your inbox to confirm your email, then sign in".to_owned())
        }
        Some(other) => Some(other.to_owned()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text_known_codes() {
        assert_eq!(
            notice_text(Some("signin_required")).as_deref(),
            Some("Please sign in to continue")
        );
        assert!(notice_text(Some("confirm_email")).is_some());
    }

    #[test]
    fn test_notice_text_passthrough_and_none() {
        assert_eq!(notice_text(Some("custom")).as_deref(), Some("custom"));
        assert_eq!(notice_text(None), None);
    }
}
