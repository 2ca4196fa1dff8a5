use axum::{extract::DefaultBodyLimit, routing::get, Router};

use super::handlers::{self, GrievanceState};
use crate::shared::constants::MAX_ATTACHMENT_SIZE;

/// Body limit for submissions: the attachment plus room for the text fields
const SUBMISSION_BODY_LIMIT: usize = MAX_ATTACHMENT_SIZE + 1024 * 1024;

/// Create routes for the citizen grievance pages
///
/// Every route requires a signed-in user.
pub fn routes(state: GrievanceState) -> Router {
    Router::new()
        .route(
            "/grievances/submit",
            get(handlers::submit_page)
                .post(handlers::submit)
                .layer(DefaultBodyLimit::max(SUBMISSION_BODY_LIMIT)),
        )
        .route("/grievances/my", get(handlers::my_grievances))
        .route(
            "/grievances/{reference_id}",
            get(handlers::grievance_detail).post(handlers::add_response),
        )
        .route(
            "/grievances/{reference_id}/attachment",
            get(handlers::download_attachment),
        )
        .with_state(state)
}
