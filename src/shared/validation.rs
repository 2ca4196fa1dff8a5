use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

lazy_static! {
    /// Regex for validating username fields
    /// Letters, digits and `@ . + - _` only
    /// - Valid: "john_doe", "jane.doe@city", "user+1", "123"
    /// - Invalid: "john doe", "user#1", ""
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();

    /// Regex for grievance reference IDs: `GR-` followed by 8 uppercase hex digits
    pub static ref REFERENCE_ID_REGEX: Regex = Regex::new(r"^GR-[0-9A-F]{8}$").unwrap();
}

/// Key for errors that belong to the form as a whole
pub const NON_FIELD_ERRORS: &str = "form";

/// Per-field error messages shown inline next to form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Flatten `validator` errors into field messages
    pub fn merge_validation(&mut self, errors: ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                self.add(&field, message);
            }
        }
    }

    /// Single message joining every error, for logs and non-form callers
    pub fn summary(&self) -> String {
        self.0
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
