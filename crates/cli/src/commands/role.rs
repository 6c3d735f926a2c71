//! Grant or revoke the admin role on a profile.
//!
//! The role column lives on the `profiles` table; the storefront's admin
//! guard reads it on every admin request, so changes take effect without
//! the user signing in again (the navigation link follows at next sign-in).

use hoodies_core::Role;
use hoodies_storefront::backend::StoreBackend;

/// Grant the admin role to the profile with the given email.
///
/// # Errors
///
/// Returns an error if configuration loading or the update fails, or if no
/// profile matches the email.
pub async fn grant(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    set_role(email, Role::Admin).await
}

/// Revoke the admin role from the profile with the given email.
///
/// # Errors
///
/// Returns an error if configuration loading or the update fails, or if no
/// profile matches the email.
pub async fn revoke(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    set_role(email, Role::Customer).await
}

async fn set_role(email: &str, role: Role) -> Result<(), Box<dyn std::error::Error>> {
    let backend = super::backend_from_env()?;

    let updated = backend.set_role_by_email(email, role).await?;
    if updated == 0 {
        return Err(format!("no profile found for {email}").into());
    }

    tracing::info!(email, role = role.as_str(), updated, "Role updated");
    Ok(())
}
