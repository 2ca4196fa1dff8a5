use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a response in a grievance thread
#[derive(Debug, Clone, FromRow)]
pub struct GrievanceResponse {
    /// UUIDv7, so ids sort in insertion order
    pub id: Uuid,
    pub grievance_id: Uuid,
    pub responder_id: Uuid,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// Response joined with its author, for rendering a thread
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResponseView {
    pub id: Uuid,
    pub response: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_is_staff: bool,
}
