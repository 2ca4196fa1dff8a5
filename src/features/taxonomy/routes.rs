use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::taxonomy::handlers;
use crate::features::taxonomy::services::TaxonomyService;

/// Create routes for the public home page
pub fn routes(service: Arc<TaxonomyService>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .with_state(service)
}
