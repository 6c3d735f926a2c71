//! Route guards.
//!
//! The authorization checks for every gated page live here, as extractors,
//! so individual handlers never duplicate gating logic: naming the guard in
//! the handler signature is the check.
//!
//! Guard failures redirect silently (no error page): missing sign-in goes
//! to `/auth`, missing admin role goes to `/`. The admin check re-resolves
//! the role from the `profiles` table on every request and fails closed -
//! a lookup error is treated as "not an admin", never surfaced.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires a signed-in user with the admin role.
///
/// The role is looked up fresh from the user's profile row; the cached
/// session flag is only trusted for navigation rendering.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for a failed guard check.
pub enum GuardRejection {
    /// Redirect to the sign-in page.
    SignIn,
    /// Redirect to the home page.
    Home,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SignIn => Redirect::to("/auth?notice=signin_required").into_response(),
            Self::Home => Redirect::to("/").into_response(),
        }
    }
}

/// Read the current user out of the request's session.
async fn session_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_user(parts)
            .await
            .map(Self)
            .ok_or(GuardRejection::SignIn)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Anonymous visitors and non-admins get the same silent redirect
        let user = session_user(parts).await.ok_or(GuardRejection::Home)?;

        // Fresh role lookup, fail-closed: errors and missing profiles both
        // read as non-admin.
        let is_admin = match state.store().profile(user.id).await {
            Ok(Some(profile)) => profile.role().is_admin(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(user = %user.id, error = %e, "Role lookup failed; denying admin access");
                false
            }
        };

        if is_admin {
            Ok(Self(user))
        } else {
            Err(GuardRejection::Home)
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request if nobody is
/// signed in. Used by public pages for the navigation shell.
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
