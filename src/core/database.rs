use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.url).await
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
}

/// Convert database error to a more specific AppError
///
/// Unique violations (23505) become `Conflict`, foreign key violations (23503)
/// become `Validation`; everything else stays a database error.
pub fn handle_db_error(e: sqlx::Error) -> crate::core::error::AppError {
    use crate::core::error::AppError;

    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            let constraint = db_err.constraint().unwrap_or("unique constraint");
            return AppError::Conflict(format!("Duplicate value violates {}", constraint));
        }

        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::Validation("Referenced record does not exist.".to_string());
        }

        // string_data_right_truncation: a value longer than its column
        if db_err.code() == Some(std::borrow::Cow::Borrowed("22001")) {
            return AppError::Validation("Ensure this value is not too long.".to_string());
        }
    }

    tracing::error!("Database error: {:?}", e);
    AppError::Database(e)
}
