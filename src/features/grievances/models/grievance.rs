use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::GrievanceStatus;

/// Database model for grievance
#[derive(Debug, Clone, FromRow)]
pub struct Grievance {
    pub id: Uuid,
    pub reference_id: String,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub status: GrievanceStatus,
    pub attachment_key: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Grievance joined with its category, department and submitter, as rendered
/// in lists and detail pages
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GrievanceView {
    pub id: Uuid,
    pub reference_id: String,
    pub title: String,
    pub description: String,
    pub status: GrievanceStatus,
    pub category_id: Uuid,
    pub category_name: String,
    pub department_name: String,
    pub user_id: Uuid,
    pub submitter_username: String,
    pub submitter_first_name: String,
    pub submitter_last_name: String,
    pub attachment_key: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

