//! Request DTOs for the web layer.
//!
//! Form fields default to empty strings so a partially filled form still
//! deserializes and the user gets field errors instead of a 400.

use serde::Deserialize;
use validator::Validate;

use super::validation::{required_text, valid_choice};
use crate::auth::RegistrationRequest;
use crate::blog::PostInput;

/// Query parameters of the post listing.
///
/// Both are kept raw; the service decides what they mean.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Category ID filter.
    pub category: Option<String>,
    /// Page number or `last`.
    pub page: Option<String>,
}

/// Post create/update form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    /// Title. Length limits are checked by the blog service.
    #[validate(custom(function = "required_text"))]
    pub title: String,
    /// Body.
    #[validate(custom(function = "required_text"))]
    pub body: String,
    /// Category ID, as submitted.
    #[validate(custom(function = "valid_choice"))]
    pub category: String,
}

impl PostForm {
    /// The submitted category as an ID.
    pub fn category_id(&self) -> Option<i64> {
        self.category.trim().parse().ok()
    }

    /// Convert a validated form into service input.
    ///
    /// Returns `None` if the category is not an integer.
    pub fn to_input(&self) -> Option<PostInput> {
        Some(PostInput::new(
            self.title.clone(),
            self.body.clone(),
            self.category_id()?,
        ))
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Username.
    pub username: String,
    /// Password.
    pub password1: String,
    /// Password confirmation.
    pub password2: String,
    /// Email (optional).
    pub email: String,
    /// Given name (optional).
    pub first_name: String,
    /// Family name (optional).
    pub last_name: String,
}

impl From<RegisterForm> for RegistrationRequest {
    fn from(form: RegisterForm) -> Self {
        let email = empty_to_none(&form.email);
        let mut request = RegistrationRequest::new(form.username.trim(), form.password1)
            .with_confirmation(form.password2)
            .with_name(form.first_name, form.last_name);
        if let Some(email) = email {
            request = request.with_email(email);
        }
        request
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
    /// Where to go after logging in.
    pub next: String,
}

/// Query parameters of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Where to go after logging in.
    pub next: Option<String>,
}

/// Trim a form value, treating blank as absent.
pub fn empty_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
