use serde::Serialize;
use uuid::Uuid;

use crate::features::taxonomy::models::{Category, Department};

/// Category as shown inside its department
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub id: Uuid,
    pub name: String,
    pub label: String,
}

impl From<Category> for CategoryOption {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            label: c.label(),
            name: c.name,
        }
    }
}

/// Department with its categories, for the home page and the submission form
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub categories: Vec<CategoryOption>,
}

impl DepartmentView {
    /// Group a flat category list under its departments, keeping input order
    pub fn group(departments: Vec<Department>, categories: Vec<Category>) -> Vec<DepartmentView> {
        departments
            .into_iter()
            .map(|department| {
                let categories = categories
                    .iter()
                    .filter(|c| c.department_id == department.id)
                    .cloned()
                    .map(CategoryOption::from)
                    .collect();

                DepartmentView {
                    id: department.id,
                    name: department.name,
                    description: department.description,
                    categories,
                }
            })
            .collect()
    }
}
