//! Staff dashboard: counts, the all-grievances list and the triage page.
//!
//! Every route is behind [`crate::features::auth::guards::RequireStaff`].

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::DashboardService;
