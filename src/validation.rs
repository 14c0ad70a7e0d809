//! Field validation rules.
//!
//! Rules are checked in a fixed order and the first one that fires is the
//! field's only error:
//!
//! 1. required and blank after trimming
//! 2. email control whose non-empty value fails the address pattern
//! 3. password control shorter than [`MIN_PASSWORD_CHARS`] UTF-16 code units
//! 4. confirm-password field that differs from the form's first password
//!
//! Everything here is pure; [`crate::forms`] reads field state from the page
//! and renders the results.

use std::sync::OnceLock;

use regex::Regex;

use crate::consts::MIN_PASSWORD_CHARS;

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

static EMAIL_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn email_pattern() -> Option<&'static Regex> {
    EMAIL_PATTERN
        .get_or_init(|| match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
            Ok(re) => Some(re),
            Err(e) => {
                log::error!("email pattern failed to compile: {e}");
                None
            }
        })
        .as_ref()
}

/// A rule violation. `Display` is the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Control kinds the rules distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Other,
}

impl FieldKind {
    /// Classify a DOM control type (`HTMLInputElement.type` and friends).
    #[must_use]
    pub fn from_control_type(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Self::Text,
            "email" => Self::Email,
            "password" => Self::Password,
            _ => Self::Other,
        }
    }
}

/// Snapshot of one control taken at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInput {
    pub required: bool,
    pub kind: FieldKind,
    pub value: String,
    /// This is the field that must repeat the password.
    pub is_confirm: bool,
}

/// Outcome of one validation pass over a form. `errors` holds the index of
/// each failing field in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub errors: Vec<(usize, ValidationError)>,
}

impl FormReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let lowered = value.to_lowercase();
    email_pattern().is_some_and(|re| re.is_match(&lowered))
}

/// Validate one field. `primary_password` is the value of the form's first
/// password control, if it has one.
pub fn validate_field(field: &FieldInput, primary_password: Option<&str>) -> Result<(), ValidationError> {
    if field.required && field.value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    if field.kind == FieldKind::Email && !field.value.is_empty() && !is_valid_email(&field.value) {
        return Err(ValidationError::InvalidEmail);
    }
    if field.kind == FieldKind::Password && field.value.encode_utf16().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if field.is_confirm {
        if let Some(password) = primary_password {
            if field.value != password {
                return Err(ValidationError::PasswordMismatch);
            }
        }
    }
    Ok(())
}

/// Validate every field of a form. The primary password is the first
/// password-kind field in `fields`.
#[must_use]
pub fn validate_form(fields: &[FieldInput]) -> FormReport {
    let primary_password = fields.iter().find(|f| f.kind == FieldKind::Password).map(|f| f.value.as_str());
    let errors = fields
        .iter()
        .enumerate()
        .filter_map(|(i, field)| validate_field(field, primary_password).err().map(|e| (i, e)))
        .collect();
    FormReport { errors }
}
