//! Grievance lifecycle, response threads and the citizen-facing pages.
//!
//! Every detail or mutation entry point runs the checks in [`access`] against
//! the explicit principal before touching a service.

pub mod access;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod reference;
pub mod routes;
pub mod services;

pub use services::{GrievanceService, ResponseService, SearchScope};
