use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::database::handle_db_error;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::dtos::{AttachmentUpload, GrievanceFilter, StatusFilter};
use crate::features::grievances::models::{Grievance, GrievanceStatus, GrievanceView};
use crate::features::grievances::reference::{generate_reference_id, is_valid_reference_id};
use crate::features::taxonomy::TaxonomyService;
use crate::modules::storage::AttachmentStorage;
use crate::shared::constants::{PERSONAL_PAGE_SIZE, STAFF_PAGE_SIZE};
use crate::shared::types::{Paginated, Paginator};

const GRIEVANCE_COLUMNS: &str = "id, reference_id, title, description, category_id, user_id, status, \
     attachment_key, attachment_name, attachment_content_type, created_at, updated_at";

const VIEW_SELECT: &str = r#"
    SELECT g.id, g.reference_id, g.title, g.description, g.status,
           g.category_id, c.name AS category_name, d.name AS department_name,
           g.user_id, u.username AS submitter_username,
           u.first_name AS submitter_first_name, u.last_name AS submitter_last_name,
           g.attachment_key, g.attachment_name, g.attachment_content_type,
           g.created_at, g.updated_at
    FROM grievances g
    JOIN categories c ON c.id = g.category_id
    JOIN departments d ON d.id = c.department_id
    JOIN users u ON u.id = g.user_id
"#;

const VIEW_COUNT: &str = r#"
    SELECT COUNT(*)
    FROM grievances g
    JOIN users u ON u.id = g.user_id
"#;

/// Which grievances a list may show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Grievances submitted by one user
    Mine(Uuid),
    /// Every grievance (staff only)
    All,
}

impl SearchScope {
    pub fn page_size(&self) -> i64 {
        match self {
            SearchScope::Mine(_) => PERSONAL_PAGE_SIZE,
            SearchScope::All => STAFF_PAGE_SIZE,
        }
    }
}

/// Data for submitting a new grievance
#[derive(Debug)]
pub struct NewGrievance {
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub attachment: Option<AttachmentUpload>,
}

/// Service for the grievance lifecycle and list queries
pub struct GrievanceService {
    pool: PgPool,
    storage: Arc<dyn AttachmentStorage>,
    taxonomy: Arc<TaxonomyService>,
}

impl GrievanceService {
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn AttachmentStorage>,
        taxonomy: Arc<TaxonomyService>,
    ) -> Self {
        Self {
            pool,
            storage,
            taxonomy,
        }
    }

    /// Create a pending grievance for the principal
    ///
    /// The attachment is stored first; if the insert then fails it is removed
    /// again.
    pub async fn submit(&self, user: &AuthenticatedUser, new: NewGrievance) -> Result<Grievance> {
        let title = new.title.trim();
        let description = new.description.trim();

        if title.is_empty() || description.is_empty() {
            return Err(AppError::Validation(
                "Title and description are required.".to_string(),
            ));
        }
        if title.chars().count() > 200 {
            return Err(AppError::Validation(
                "Title must be at most 200 characters.".to_string(),
            ));
        }

        if self.taxonomy.get_category(new.category_id).await?.is_none() {
            return Err(AppError::Validation(
                "Select a valid choice. That choice is not one of the available choices."
                    .to_string(),
            ));
        }

        let reference_id = generate_reference_id();

        let stored = match new.attachment {
            Some(upload) => {
                upload.check().map_err(AppError::Validation)?;
                let key = format!(
                    "grievance_attachments/{}/{}.{}",
                    reference_id,
                    Uuid::new_v4(),
                    upload.extension()
                );
                self.storage
                    .store(&key, upload.data, &upload.content_type)
                    .await?;
                Some((key, upload.file_name, upload.content_type))
            }
            None => None,
        };

        let (attachment_key, attachment_name, attachment_content_type) = match &stored {
            Some((key, name, content_type)) => (
                Some(key.as_str()),
                Some(name.as_str()),
                Some(content_type.as_str()),
            ),
            None => (None, None, None),
        };

        let inserted = self
            .insert(
                &reference_id,
                title,
                description,
                new.category_id,
                user.user_id,
                attachment_key,
                attachment_name,
                attachment_content_type,
            )
            .await;

        match inserted {
            Ok(grievance) => {
                info!(
                    "Grievance {} submitted by {}",
                    grievance.reference_id, user.username
                );
                Ok(grievance)
            }
            Err(e) => {
                if let Some(key) = attachment_key {
                    if let Err(cleanup) = self.storage.delete(key).await {
                        warn!("Failed to remove orphaned attachment {}: {}", key, cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert(
        &self,
        reference_id: &str,
        title: &str,
        description: &str,
        category_id: Uuid,
        user_id: Uuid,
        attachment_key: Option<&str>,
        attachment_name: Option<&str>,
        attachment_content_type: Option<&str>,
    ) -> Result<Grievance> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let query = format!(
            r#"
            INSERT INTO grievances
                (reference_id, title, description, category_id, user_id,
                 attachment_key, attachment_name, attachment_content_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            GRIEVANCE_COLUMNS
        );

        let grievance = sqlx::query_as::<_, Grievance>(&query)
            .bind(reference_id)
            .bind(title)
            .bind(description)
            .bind(category_id)
            .bind(user_id)
            .bind(attachment_key)
            .bind(attachment_name)
            .bind(attachment_content_type)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit grievance: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(grievance)
    }

    /// Look up a grievance by its reference ID
    ///
    /// Strings that are not reference IDs are `NotFound` without a query.
    pub async fn get_by_reference(&self, reference_id: &str) -> Result<GrievanceView> {
        if !is_valid_reference_id(reference_id) {
            return Err(AppError::NotFound("Grievance not found".to_string()));
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(VIEW_SELECT);
        qb.push(" WHERE g.reference_id = ");
        qb.push_bind(reference_id);

        qb.build_query_as::<GrievanceView>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get grievance by reference: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Grievance not found".to_string()))
    }

    /// Move a grievance to any status, refreshing `updated_at`
    ///
    /// Callers must have checked `access::can_set_status` first.
    pub async fn set_status(
        &self,
        reference_id: &str,
        status: GrievanceStatus,
        acting_user: &AuthenticatedUser,
    ) -> Result<Grievance> {
        if !is_valid_reference_id(reference_id) {
            return Err(AppError::NotFound("Grievance not found".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let query = format!(
            r#"
            UPDATE grievances
            SET status = $1, updated_at = NOW()
            WHERE reference_id = $2
            RETURNING {}
            "#,
            GRIEVANCE_COLUMNS
        );

        let grievance = sqlx::query_as::<_, Grievance>(&query)
            .bind(status)
            .bind(reference_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| AppError::NotFound("Grievance not found".to_string()))?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit status change: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Grievance {} set to {} by {}",
            grievance.reference_id, grievance.status, acting_user.username
        );

        Ok(grievance)
    }

    /// Filtered, newest-first page of grievances within a scope
    ///
    /// Out-of-range page numbers are clamped to the nearest valid page.
    pub async fn search(
        &self,
        scope: SearchScope,
        filter: &GrievanceFilter,
        page: i64,
    ) -> Result<Paginated<GrievanceView>> {
        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(VIEW_COUNT);
        push_filters(&mut count_qb, scope, filter);

        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count grievances: {:?}", e);
                AppError::Database(e)
            })?;

        let paginator = Paginator::new(total, scope.page_size());
        let number = paginator.clamp(page);

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(VIEW_SELECT);
        push_filters(&mut qb, scope, filter);
        qb.push(" ORDER BY g.created_at DESC, g.id DESC LIMIT ");
        qb.push_bind(paginator.limit());
        qb.push(" OFFSET ");
        qb.push_bind(paginator.offset(number));

        let items = qb
            .build_query_as::<GrievanceView>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list grievances: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(Paginated::new(items, number, paginator))
    }

    /// Bytes and metadata of a grievance's attachment
    pub async fn attachment(&self, grievance: &GrievanceView) -> Result<(Vec<u8>, String, String)> {
        let key = grievance
            .attachment_key
            .as_deref()
            .ok_or_else(|| AppError::NotFound("This grievance has no attachment".to_string()))?;

        let data = self.storage.fetch(key).await?;
        let name = grievance
            .attachment_name
            .clone()
            .unwrap_or_else(|| "attachment".to_string());
        let content_type = grievance
            .attachment_content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok((data, name, content_type))
    }
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, scope: SearchScope, filter: &GrievanceFilter) {
    qb.push(" WHERE TRUE");

    if let SearchScope::Mine(user_id) = scope {
        qb.push(" AND g.user_id = ");
        qb.push_bind(user_id);
    }

    match &filter.status {
        StatusFilter::Any => {}
        StatusFilter::Is(status) => {
            qb.push(" AND g.status = ");
            qb.push_bind(*status);
        }
        StatusFilter::Unknown(_) => {
            qb.push(" AND FALSE");
        }
    }

    if let Some(text) = &filter.text {
        let pattern = like_pattern(text);

        qb.push(" AND (g.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR g.reference_id ILIKE ");
        qb.push_bind(pattern.clone());

        if scope == SearchScope::All {
            qb.push(" OR u.first_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR u.last_name ILIKE ");
            qb.push_bind(pattern);
        }

        qb.push(")");
    }
}
