pub mod auth_context;
pub mod logging;

pub use auth_context::AuthContext;
