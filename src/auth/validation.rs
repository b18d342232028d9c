//! Input validation for dsforum.
//!
//! All form input passes through here before it reaches a repository.
//! Limits come from the `[rules]` config section; the defaults match
//! the messages users see.
//!
//! Each validator trims its input first and returns the trimmed value
//! on success. Checks short-circuit: minimum length, then maximum
//! length, then pattern, then (for passwords) complexity.

use serde::Deserialize;
use thiserror::Error;

/// A rejected form field, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Validation limits, configurable via the `[rules]` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct Rules {
    /// Minimum username length.
    #[serde(default = "default_username_min")]
    pub username_min: usize,
    /// Maximum username length.
    #[serde(default = "default_username_max")]
    pub username_max: usize,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min: usize,
    /// Require uppercase, lowercase, digit, and special character in passwords.
    #[serde(default = "default_password_complexity")]
    pub password_complexity: bool,
    /// Minimum thread title length.
    #[serde(default = "default_title_min")]
    pub title_min: usize,
    /// Maximum thread title length.
    #[serde(default = "default_title_max")]
    pub title_max: usize,
    /// Minimum thread or reply body length.
    #[serde(default = "default_body_min")]
    pub body_min: usize,
}

fn default_username_min() -> usize {
    3
}

fn default_username_max() -> usize {
    16
}

fn default_password_min() -> usize {
    8
}

fn default_password_complexity() -> bool {
    true
}

fn default_title_min() -> usize {
    3
}

fn default_title_max() -> usize {
    255
}

fn default_body_min() -> usize {
    10
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            username_min: default_username_min(),
            username_max: default_username_max(),
            password_min: default_password_min(),
            password_complexity: default_password_complexity(),
            title_min: default_title_min(),
            title_max: default_title_max(),
            body_min: default_body_min(),
        }
    }
}

impl Rules {
    /// Validate a username: length bounds, then ASCII letters only.
    ///
    /// Returns the trimmed username.
    pub fn validate_username(&self, raw: &str) -> Result<String, ValidationError> {
        let value = raw.trim();
        let len = value.chars().count();
        if len < self.username_min || len > self.username_max {
            return Err(ValidationError(format!(
                "Username must be {}-{} characters",
                self.username_min, self.username_max
            )));
        }
        if !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError(
                "Username must be letters only".to_string(),
            ));
        }
        Ok(value.to_string())
    }

    /// Validate a password: minimum length, then character-class
    /// complexity when enabled.
    ///
    /// Returns the trimmed password.
    pub fn validate_password(&self, raw: &str) -> Result<String, ValidationError> {
        let value = raw.trim();
        if value.chars().count() < self.password_min {
            return Err(ValidationError(format!(
                "Password must be at least {} characters",
                self.password_min
            )));
        }
        if self.password_complexity {
            let mut missing = Vec::new();
            if !value.chars().any(|c| c.is_ascii_uppercase()) {
                missing.push("uppercase letter");
            }
            if !value.chars().any(|c| c.is_ascii_lowercase()) {
                missing.push("lowercase letter");
            }
            if !value.chars().any(|c| c.is_ascii_digit()) {
                missing.push("number");
            }
            if !value.chars().any(|c| !c.is_ascii_alphanumeric()) {
                missing.push("special character");
            }
            if !missing.is_empty() {
                return Err(ValidationError(format!(
                    "Password needs: {}",
                    missing.join(", ")
                )));
            }
        }
        Ok(value.to_string())
    }

    /// Validate a thread title: length bounds.
    ///
    /// Returns the trimmed title.
    pub fn validate_title(&self, raw: &str) -> Result<String, ValidationError> {
        let value = raw.trim();
        let len = value.chars().count();
        if len < self.title_min || len > self.title_max {
            return Err(ValidationError(format!(
                "Title must be {}-{} characters",
                self.title_min, self.title_max
            )));
        }
        Ok(value.to_string())
    }

    /// Validate a thread or reply body: minimum length.
    ///
    /// Returns the trimmed body.
    pub fn validate_body(&self, raw: &str) -> Result<String, ValidationError> {
        let value = raw.trim();
        if value.chars().count() < self.body_min {
            return Err(ValidationError(format!(
                "Body must be at least {} characters",
                self.body_min
            )));
        }
        Ok(value.to_string())
    }
}
