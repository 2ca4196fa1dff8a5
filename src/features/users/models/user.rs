use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

/// Database model for user account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Principal stored in the session after login
    pub fn to_principal(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: self.id,
            username: self.username.clone(),
            full_name: self.full_name(),
            is_staff: self.is_staff,
        }
    }
}

/// Database model for the extended profile, one per user
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub phone: String,
    pub address: String,
}
