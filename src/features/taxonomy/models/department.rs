use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for department
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}
