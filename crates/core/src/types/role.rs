//! Profile roles.

use serde::{Deserialize, Serialize};

/// Role flag on a user's profile.
///
/// Distinguishes admins from ordinary customers. The hosted backend stores
/// this as a free-text column, so parsing is deliberately fail-closed:
/// anything that is not exactly `"admin"` - including a missing column,
/// an unknown value, or a failed lookup upstream - is a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    /// Parse a role from the raw database column, failing closed.
    #[must_use]
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// Whether this role grants access to the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The database representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}
