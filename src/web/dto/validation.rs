//! Custom validators and form-redisplay helpers.

use std::collections::HashMap;

use serde::Serialize;

use crate::web::error::{field_errors_from_validator, FieldErrors};

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required")
            .with_message("This field is required".into()));
    }
    Ok(())
}

/// Non-blank text without control characters.
pub fn required_text(value: &str) -> Result<(), validator::ValidationError> {
    not_empty_trimmed(value)?;
    no_control_chars(value)
}

/// Validate that a choice field holds an ID.
pub fn valid_choice(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().parse::<i64>().is_err() {
        return Err(validator::ValidationError::new("invalid_choice")
            .with_message("Select a valid choice".into()));
    }
    Ok(())
}

/// Submitted values and their errors, for redisplaying a form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    /// Values as submitted, by field name.
    pub values: HashMap<String, String>,
    /// Error messages by field name.
    pub errors: FieldErrors,
}

impl FormState {
    /// A form with initial values and no errors.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            errors: FieldErrors::new(),
        }
    }

    /// Add one error message to a field.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Merge `validator` errors.
    pub fn add_validator_errors(&mut self, errors: &validator::ValidationErrors) {
        for (field, messages) in field_errors_from_validator(errors) {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    /// Whether any field has an error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
