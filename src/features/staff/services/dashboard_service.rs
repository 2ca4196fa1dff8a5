use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::core::error::{AppError, Result};

/// Grievance totals shown on the staff dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
}

/// Service for staff dashboard aggregates
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count all grievances, total and per status, in one scan
    pub async fn status_counts(&self) -> Result<StatusCounts> {
        sqlx::query_as::<_, StatusCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM grievances
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count grievances by status: {:?}", e);
            AppError::Database(e)
        })
    }
}
