//! Template engine for server-rendered pages using Jinja2 syntax.
//!
//! Templates live in `templates/` and are compiled into the binary. Names ending
//! in `.html` are auto-escaped.

use chrono::DateTime;
use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

use crate::features::grievances::models::GrievanceStatus;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Every page template, keyed by the name handlers render it under
const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("error.html", include_str!("../../templates/error.html")),
    ("home.html", include_str!("../../templates/home.html")),
    (
        "registration/register.html",
        include_str!("../../templates/registration/register.html"),
    ),
    (
        "registration/login.html",
        include_str!("../../templates/registration/login.html"),
    ),
    (
        "grievances/submit.html",
        include_str!("../../templates/grievances/submit.html"),
    ),
    (
        "grievances/my_grievances.html",
        include_str!("../../templates/grievances/my_grievances.html"),
    ),
    (
        "grievances/detail.html",
        include_str!("../../templates/grievances/detail.html"),
    ),
    (
        "grievances/_pagination.html",
        include_str!("../../templates/grievances/_pagination.html"),
    ),
    (
        "grievances/_responses.html",
        include_str!("../../templates/grievances/_responses.html"),
    ),
    (
        "staff/dashboard.html",
        include_str!("../../templates/staff/dashboard.html"),
    ),
    (
        "staff/grievance_list.html",
        include_str!("../../templates/staff/grievance_list.html"),
    ),
    (
        "staff/grievance_detail.html",
        include_str!("../../templates/staff/grievance_detail.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// `{{ grievance.created_at|datetime }}`: RFC 3339 timestamps as "Mar 04, 2026 14:05"
fn datetime_filter(value: String) -> String {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.format("%b %d, %Y %H:%M").to_string())
        .unwrap_or(value)
}

/// `{{ grievance.status|status_label }}`: "in_progress" as "In Progress"
fn status_label_filter(value: String) -> String {
    value
        .parse::<GrievanceStatus>()
        .map(|status| status.label().to_string())
        .unwrap_or(value)
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("datetime", datetime_filter);
    env.add_filter("status_label", status_label_filter);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with the given context.
///
/// # Example
/// ```ignore
/// use minijinja::context;
///
/// let html = render("home.html", context! { departments => departments })?;
/// ```
pub fn render(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Check if a template exists
#[allow(dead_code)]
pub fn template_exists(template_name: &str) -> bool {
    get_environment().get_template(template_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_every_template_compiles() {
        for (name, _) in TEMPLATES {
            assert!(template_exists(name), "template {} failed to load", name);
        }
    }

    #[test]
    fn test_missing_template() {
        let result = render("definitely_not_a_real_template.html", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_html_is_escaped() {
        let html = render(
            "error.html",
            context! {
                status => 400,
                reason => "Bad Request",
                message => "<script>alert(1)</script>",
            },
        )
        .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_filters() {
        assert_eq!(
            datetime_filter("2026-03-04T14:05:09.123456Z".to_string()),
            "Mar 04, 2026 14:05"
        );
        assert_eq!(datetime_filter("yesterday".to_string()), "yesterday");
        assert_eq!(status_label_filter("in_progress".to_string()), "In Progress");
        assert_eq!(status_label_filter("unknown".to_string()), "unknown");
    }
}
