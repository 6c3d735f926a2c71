//! Navigation shell view model.
//!
//! Every page template embeds the role-aware navigation: Shop always,
//! Dashboard and Sign out when signed in, Admin when the signed-in user
//! carries the admin flag, Sign in otherwise.

use super::session::CurrentUser;

/// Navigation context rendered by the base layout.
#[derive(Debug, Clone)]
pub struct Nav {
    /// The signed-in user, if any.
    pub user: Option<NavUser>,
}

/// Identity details the navigation needs.
#[derive(Debug, Clone)]
pub struct NavUser {
    pub email: String,
    pub is_admin: bool,
}

impl Nav {
    /// Navigation for an anonymous visitor.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { user: None }
    }

    /// Navigation for an optional session user.
    #[must_use]
    pub fn for_user(user: Option<&CurrentUser>) -> Self {
        Self {
            user: user.map(|u| NavUser {
                email: u.email.clone(),
                is_admin: u.is_admin,
            }),
        }
    }
}
