use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::handle_db_error;
use crate::core::error::{AppError, Result};
use crate::features::auth::services::password;
use crate::features::users::dtos::RegisterForm;
use crate::features::users::models::{User, UserProfile};

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Validated account data ready to persist
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
}

/// Service for user accounts and profiles
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a citizen account from an already-checked form
    pub async fn register(&self, form: RegisterForm) -> Result<User> {
        if self.find_by_username(&form.username).await?.is_some() {
            return Err(AppError::Validation(USERNAME_TAKEN.to_string()));
        }

        let password_hash = password::hash_password(form.password1).await?;

        let account = NewAccount {
            username: form.username,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
            password_hash,
            phone: form.phone,
            address: form.address,
        };

        let user = self.create_account(&account).await?;
        tracing::info!("Registered user {} ({})", user.username, user.id);

        Ok(user)
    }

    /// Insert the user and its profile in one transaction
    ///
    /// Either both rows exist afterwards or neither does.
    pub async fn create_account(&self, account: &NewAccount) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, email, first_name, last_name, is_staff, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match handle_db_error(e) {
            // Lost a race with a concurrent registration
            AppError::Conflict(_) => AppError::Validation(USERNAME_TAKEN.to_string()),
            other => other,
        })?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, phone, address)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(&account.phone)
        .bind(&account.address)
        .execute(&mut *tx)
        .await
        .map_err(handle_db_error)?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit registration: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, is_staff, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by username: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Current account row; sessions re-read it so role changes apply at once
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, is_staff, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by id: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Contact details of a user, shown to staff on the grievance page
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, phone, address
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user profile: {:?}", e);
            AppError::Database(e)
        })
    }
}
