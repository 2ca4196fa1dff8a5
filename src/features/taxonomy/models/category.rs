use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category, joined with its department's name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub department_name: String,
}

impl Category {
    /// Label used in category pickers, e.g. "Public Works / Streetlights"
    pub fn label(&self) -> String {
        format!("{} / {}", self.department_name, self.name)
    }
}
