//! Department/category taxonomy.
//!
//! Read-only from the web app; rows are managed directly in the database.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TaxonomyService;
