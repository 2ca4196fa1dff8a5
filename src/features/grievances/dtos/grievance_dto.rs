use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::features::grievances::models::GrievanceStatus;
use crate::shared::constants::{ALLOWED_ATTACHMENT_TYPES, MAX_ATTACHMENT_SIZE};
use crate::shared::types::parse_page_number;
use crate::shared::validation::FormErrors;

const REQUIRED: &str = "This field is required.";

/// Grievance submission fields, collected from a multipart body
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct SubmitGrievanceForm {
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub title: String,
    pub description: String,
    /// Raw category id as posted by the `<select>`
    pub category: String,
}

impl SubmitGrievanceForm {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }

    pub fn category_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.category).ok()
    }

    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = self.validate() {
            errors.merge_validation(e);
        }
        if self.title.is_empty() {
            errors.add("title", REQUIRED);
        }
        if self.description.is_empty() {
            errors.add("description", REQUIRED);
        }
        if self.category.is_empty() {
            errors.add("category", REQUIRED);
        } else if self.category_id().is_none() {
            errors.add(
                "category",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }

        errors
    }
}

/// An uploaded attachment held in memory until it is stored
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AttachmentUpload {
    /// Check size and MIME type, returning the user-facing message on failure
    pub fn check(&self) -> Result<(), String> {
        if self.data.len() > MAX_ATTACHMENT_SIZE {
            return Err(format!(
                "File too large. Maximum size is {} MB.",
                MAX_ATTACHMENT_SIZE / 1024 / 1024
            ));
        }

        if !ALLOWED_ATTACHMENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(format!(
                "File type '{}' is not allowed. Upload an image (JPEG, PNG, GIF, WebP) or a PDF.",
                self.content_type
            ));
        }

        Ok(())
    }

    /// File extension derived from the content type
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "application/pdf" => "pdf",
            _ => "bin",
        }
    }
}

/// A response posted to a grievance thread
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseForm {
    #[serde(default)]
    pub response: String,
}

/// Query string of the grievance lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrievanceListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

/// Status part of a list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum StatusFilter {
    #[default]
    Any,
    Is(GrievanceStatus),
    /// A value outside the four statuses; matches no grievance
    Unknown(String),
}

impl StatusFilter {
    /// Value to echo back into the `status` query parameter
    pub fn as_param(&self) -> &str {
        match self {
            StatusFilter::Any => "",
            StatusFilter::Is(status) => status.as_str(),
            StatusFilter::Unknown(raw) => raw,
        }
    }
}

/// Parsed list filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrievanceFilter {
    /// Exact status match
    pub status: StatusFilter,
    /// Case-insensitive substring
    pub text: Option<String>,
}

impl GrievanceFilter {
    /// Filter parameters to append to pagination links, e.g. `&search=lamp&status=pending`
    pub fn query_suffix(&self) -> String {
        format!(
            "&search={}&status={}",
            urlencoding::encode(self.text.as_deref().unwrap_or("")),
            urlencoding::encode(self.status.as_param())
        )
    }
}

impl GrievanceListQuery {
    /// Blank values mean "no filter"; an unknown status matches nothing
    pub fn filter(&self) -> GrievanceFilter {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => StatusFilter::Any,
            Some(raw) => match raw.parse::<GrievanceStatus>() {
                Ok(status) => StatusFilter::Is(status),
                Err(_) => StatusFilter::Unknown(raw.to_string()),
            },
        };

        GrievanceFilter {
            status,
            text: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn page(&self) -> i64 {
        parse_page_number(self.page.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str, category: &str) -> SubmitGrievanceForm {
        SubmitGrievanceForm {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        }
        .normalized()
    }

    #[test]
    fn test_valid_submission() {
        let category = Uuid::new_v4().to_string();
        let form = form("Broken streetlight", "Dark since Monday", &category);

        assert!(form.check().is_empty());
        assert_eq!(form.category_id().map(|id| id.to_string()), Some(category));
    }

    #[test]
    fn test_blank_fields_are_required() {
        let errors = form("   ", "\t", "").check();

        assert_eq!(errors.get("title"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.get("description").is_some());
        assert!(errors.get("category").is_some());
    }

    #[test]
    fn test_title_length_limit() {
        let category = Uuid::new_v4().to_string();
        assert!(form(&"x".repeat(200), "d", &category).check().is_empty());
        assert!(form(&"x".repeat(201), "d", &category)
            .check()
            .get("title")
            .is_some());
    }

    #[test]
    fn test_invalid_category_id() {
        let errors = form("Title", "Body", "not-a-uuid").check();
        assert!(errors.get("category").is_some());
    }

    #[test]
    fn test_attachment_checks() {
        let mut upload = AttachmentUpload {
            file_name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            data: vec![0; 16],
        };
        assert!(upload.check().is_ok());
        assert_eq!(upload.extension(), "png");

        upload.content_type = "application/x-msdownload".to_string();
        assert!(upload.check().is_err());

        upload.content_type = "application/pdf".to_string();
        upload.data = vec![0; MAX_ATTACHMENT_SIZE + 1];
        assert!(upload.check().is_err());
    }

    #[test]
    fn test_blank_filters_mean_no_filter() {
        let query = GrievanceListQuery {
            search: Some("  ".to_string()),
            status: Some(" ".to_string()),
            page: Some("abc".to_string()),
        };

        assert_eq!(query.filter(), GrievanceFilter::default());
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_unknown_status_is_kept_as_unknown() {
        let query = GrievanceListQuery {
            status: Some("closed".to_string()),
            ..Default::default()
        };

        let filter = query.filter();
        assert_eq!(filter.status, StatusFilter::Unknown("closed".to_string()));
        assert_eq!(filter.query_suffix(), "&search=&status=closed");
    }

    #[test]
    fn test_filter_parses_status_and_text() {
        let query = GrievanceListQuery {
            search: Some(" streetlight ".to_string()),
            status: Some("resolved".to_string()),
            page: Some("2".to_string()),
        };

        let filter = query.filter();
        assert_eq!(filter.status, StatusFilter::Is(GrievanceStatus::Resolved));
        assert_eq!(filter.text.as_deref(), Some("streetlight"));
        assert_eq!(query.page(), 2);
    }

    #[test]
    fn test_query_suffix_encodes_search() {
        let filter = GrievanceFilter {
            status: StatusFilter::Is(GrievanceStatus::InProgress),
            text: Some("lamp & post".to_string()),
        };
        assert_eq!(
            filter.query_suffix(),
            "&search=lamp%20%26%20post&status=in_progress"
        );
        assert_eq!(GrievanceFilter::default().query_suffix(), "&search=&status=");
    }
}
