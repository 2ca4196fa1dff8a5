//! Role-based authorization guards.
//!
//! The role model is a single `is_staff` bit: staff see and manage every
//! grievance, everyone else only their own.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for staff-only routes.
///
/// Anonymous callers are sent to the login page; signed-in non-staff users get
/// the generic permission denial.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(user): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = <AuthenticatedUser as FromRequestParts<S>>::from_request_parts(parts, state).await?;

        if !user.is_staff {
            tracing::warn!(
                "Non-staff user {} denied access to {}",
                user.username,
                parts.uri.path()
            );
            return Err(AppError::permission_denied());
        }

        Ok(RequireStaff(user))
    }
}
