use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;

use super::model::{AuthenticatedUser, SessionClaims};
use crate::core::config::SessionConfig;
use crate::core::error::AppError;
use crate::shared::constants::SESSION_COOKIE;
use crate::shared::cookies::{build_cookie, expired_cookie, CookieOptions};

const SESSION_ISSUER: &str = "grievance-portal";
const SESSION_AUDIENCE: &str = "grievance-portal-web";

/// Issues and validates HS256-signed session tokens carried in a cookie
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl,
            cookie_secure: config.cookie_secure,
        }
    }

    /// Sign a session token for the user
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.user_id,
            username: user.username.clone(),
            name: user.full_name.clone(),
            is_staff: user.is_staff,
            iss: SESSION_ISSUER.to_string(),
            aud: SESSION_AUDIENCE.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify signature, issuer, audience and expiry
    pub fn validate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(token_data.claims.into())
    }

    /// `Set-Cookie` value that stores the session token
    pub fn login_cookie(&self, token: &str) -> String {
        build_cookie(
            SESSION_COOKIE,
            token,
            CookieOptions {
                max_age: Some(self.ttl),
                http_only: true,
                secure: self.cookie_secure,
            },
        )
    }

    /// `Set-Cookie` value that ends the session
    pub fn logout_cookie(&self) -> String {
        expired_cookie(SESSION_COOKIE)
    }
}
