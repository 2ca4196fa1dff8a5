use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validation::{FormErrors, USERNAME_REGEX};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration form fields. Passwords are never echoed back to the template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 150, message = "Username is required (150 characters or fewer)."),
        regex(
            path = *USERNAME_REGEX,
            message = "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,

    #[serde(default)]
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this value has at most 254 characters.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 30, message = "First name is required (30 characters or fewer)."))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 30, message = "Last name is required (30 characters or fewer)."))]
    pub last_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 15, message = "Phone is required (15 characters or fewer)."))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Address is required."))]
    pub address: String,

    #[serde(default, skip_serializing)]
    pub password1: String,

    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl RegisterForm {
    /// Trim surrounding whitespace from every field except the passwords
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.address = self.address.trim().to_string();
        self
    }

    /// Field validation plus password strength and confirmation rules
    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        if let Err(e) = self.validate() {
            errors.merge_validation(e);
        }

        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        } else {
            if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
                errors.add(
                    "password1",
                    format!(
                        "This password is too short. It must contain at least {} characters.",
                        MIN_PASSWORD_LENGTH
                    ),
                );
            }
            if self.password1.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password1", "This password is entirely numeric.");
            }
            if !self.username.is_empty() && self.password1.eq_ignore_ascii_case(&self.username) {
                errors.add("password1", "The password is too similar to the username.");
            }
        }

        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors
    }
}
