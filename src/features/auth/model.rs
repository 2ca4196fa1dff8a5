use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in principal, resolved from the session cookie on each request
/// and passed explicitly into every access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    /// "First Last", may be empty
    pub full_name: String,
    pub is_staff: bool,
}

impl AuthenticatedUser {
    /// Name shown in page headers and response threads
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Claims stored in the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub username: String,
    pub name: String,
    pub is_staff: bool,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            full_name: claims.name,
            is_staff: claims.is_staff,
        }
    }
}
