//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for services outside the database, currently attachment
//! storage.

pub mod storage;
