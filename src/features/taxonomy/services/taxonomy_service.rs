use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::taxonomy::dtos::DepartmentView;
use crate::features::taxonomy::models::{Category, Department};

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.department_id, c.name, d.name AS department_name
    FROM categories c
    JOIN departments d ON d.id = c.department_id
"#;

/// Service for department and category lookups
pub struct TaxonomyService {
    pool: PgPool,
}

impl TaxonomyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All departments ordered by name
    pub async fn list_departments(&self) -> Result<Vec<Department>> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT id, name, description
            FROM departments
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list departments: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Categories ordered by department name then category name, optionally
    /// restricted to one department
    pub async fn list_categories(&self, department_id: Option<Uuid>) -> Result<Vec<Category>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(CATEGORY_SELECT);

        if let Some(department_id) = department_id {
            qb.push(" WHERE c.department_id = ");
            qb.push_bind(department_id);
        }

        qb.push(" ORDER BY d.name, c.name, c.id");

        qb.build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(CATEGORY_SELECT);
        qb.push(" WHERE c.id = ");
        qb.push_bind(id);

        qb.build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Departments each with their categories
    pub async fn grouped(&self) -> Result<Vec<DepartmentView>> {
        let departments = self.list_departments().await?;
        let categories = self.list_categories(None).await?;

        Ok(DepartmentView::group(departments, categories))
    }
}
