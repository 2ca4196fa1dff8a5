use axum::{routing::get, Router};

use crate::features::staff::handlers::{self, StaffState};

/// Create routes for the staff dashboard
///
/// Every handler extracts `RequireStaff`.
pub fn routes(state: StaffState) -> Router {
    Router::new()
        .route("/staff/dashboard", get(handlers::dashboard))
        .route("/staff/grievances", get(handlers::grievance_list))
        .route(
            "/staff/grievances/{reference_id}",
            get(handlers::grievance_detail).post(handlers::grievance_action),
        )
        .with_state(state)
}
