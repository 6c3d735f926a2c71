//! HTTP middleware: cookie sessions and route guards.

pub mod guards;
pub mod session;

pub use guards::{
    OptionalUser, RequireAdmin, RequireUser, clear_current_user, set_current_user,
};
pub use session::create_session_layer;
