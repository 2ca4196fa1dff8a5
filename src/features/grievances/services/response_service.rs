use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::database::handle_db_error;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::models::{GrievanceResponse, ResponseView};
use crate::features::grievances::reference::is_valid_reference_id;

/// Service for the append-only response thread of a grievance
///
/// No authorization happens here; handlers run `access::can_respond` first.
pub struct ResponseService {
    pool: PgPool,
}

impl ResponseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a response by `author` to the grievance
    pub async fn add_response(
        &self,
        reference_id: &str,
        author: &AuthenticatedUser,
        body: &str,
    ) -> Result<GrievanceResponse> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("This field is required.".to_string()));
        }
        if !is_valid_reference_id(reference_id) {
            return Err(AppError::NotFound("Grievance not found".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let grievance_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM grievances WHERE reference_id = $1",
        )
        .bind(reference_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(handle_db_error)?
        .ok_or_else(|| AppError::NotFound("Grievance not found".to_string()))?;

        let response = sqlx::query_as::<_, GrievanceResponse>(
            r#"
            INSERT INTO grievance_responses (id, grievance_id, responder_id, response)
            VALUES ($1, $2, $3, $4)
            RETURNING id, grievance_id, responder_id, response, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(grievance_id)
        .bind(author.user_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit response: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Response added to {} by {}{}",
            reference_id,
            author.username,
            if author.is_staff { " (staff)" } else { "" }
        );

        Ok(response)
    }

    /// Thread of a grievance, oldest first
    pub async fn list_responses(&self, reference_id: &str) -> Result<Vec<ResponseView>> {
        sqlx::query_as::<_, ResponseView>(
            r#"
            SELECT r.id, r.response, r.created_at,
                   u.username AS author_username,
                   u.first_name AS author_first_name,
                   u.last_name AS author_last_name,
                   u.is_staff AS author_is_staff
            FROM grievance_responses r
            JOIN grievances g ON g.id = r.grievance_id
            JOIN users u ON u.id = r.responder_id
            WHERE g.reference_id = $1
            ORDER BY r.created_at, r.id
            "#,
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list responses: {:?}", e);
            AppError::Database(e)
        })
    }
}
