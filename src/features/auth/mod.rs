//! Session-based authentication.
//!
//! Login verifies an Argon2 password hash and hands out a signed session
//! cookie; `core::middleware::session_middleware` turns that cookie back into
//! an [`model::AuthenticatedUser`] on every request.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
mod session;

pub use services::AuthService;
pub use session::SessionManager;
