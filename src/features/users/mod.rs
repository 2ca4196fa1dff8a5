//! Identity & profile store.
//!
//! Accounts are created through self-registration, which writes the user and
//! its one-to-one profile in a single transaction.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
