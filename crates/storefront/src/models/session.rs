//! Session-related types.
//!
//! Types stored in the cookie session for authentication state. The cookie
//! session is transport state only; identity itself belongs to the hosted
//! backend.

use serde::{Deserialize, Serialize};

use hoodies_core::UserId;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend auth user ID.
    pub id: UserId,
    /// User's email address.
    pub email: String,
    /// Admin flag resolved at sign-in (fail-closed). Used for navigation
    /// rendering only; admin routes re-check the role on every request.
    pub is_admin: bool,
    /// Backend access token, kept so sign-out can revoke it.
    pub access_token: String,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
