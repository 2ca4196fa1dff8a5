use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::password;
use crate::features::auth::SessionManager;
use crate::features::users::UserService;

const INVALID_CREDENTIALS: &str = "Please enter a correct username and password.";

/// Service for authentication operations (login, session cookies)
pub struct AuthService {
    user_service: Arc<UserService>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, sessions: Arc<SessionManager>) -> Self {
        Self {
            user_service,
            sessions,
        }
    }

    /// Verify credentials and resolve the principal
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let user = self
            .user_service
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.to_string()))?;

        let matches =
            password::verify_password(password.to_string(), user.password_hash.clone()).await?;

        if !matches {
            tracing::info!("Failed login for {}", user.username);
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user.to_principal())
    }

    /// Authenticate and sign a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<(AuthenticatedUser, String)> {
        let user = self.authenticate(username, password).await?;
        let token = self.sessions.issue(&user)?;

        tracing::info!("User {} logged in", user.username);

        Ok((user, token))
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}
