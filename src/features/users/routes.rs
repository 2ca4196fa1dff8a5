use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Create routes for self-registration
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register),
        )
        .with_state(service)
}
