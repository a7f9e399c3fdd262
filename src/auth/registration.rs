//! User registration for Quill.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_registration, RegistrationFields, ValidationError};
use crate::auth::{hash_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};
use crate::BlogError;

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// One or more fields failed validation.
    #[error("validation error: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Username already exists.
    #[error("a user with that username already exists")]
    UsernameExists,

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RegistrationError {
    /// Errors the user can fix, as `(field, message)` pairs.
    ///
    /// Empty for server-side failures.
    pub fn field_errors(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Validation(errors) => errors.iter().map(|e| (e.field(), e.to_string())).collect(),
            Self::UsernameExists => vec![("username", self.to_string())],
            Self::Password(_) | Self::Database(_) => Vec::new(),
        }
    }
}

impl From<BlogError> for RegistrationError {
    fn from(e: BlogError) -> Self {
        RegistrationError::Database(e.to_string())
    }
}

/// Registration request data.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// Password.
    pub password1: String,
    /// Password confirmation.
    pub password2: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl RegistrationRequest {
    /// Create a request whose confirmation matches the password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            password2: password.clone(),
            password1: password,
            ..Default::default()
        }
    }

    /// Set the password confirmation.
    pub fn with_confirmation(mut self, password2: impl Into<String>) -> Self {
        self.password2 = password2.into();
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the given and family names.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    fn fields(&self) -> RegistrationFields<'_> {
        RegistrationFields {
            username: &self.username,
            password1: &self.password1,
            password2: &self.password2,
            email: self.email.as_deref(),
            first_name: &self.first_name,
            last_name: &self.last_name,
        }
    }
}

/// Register a new user.
///
/// Validates every field, rejects a taken username (case-insensitive),
/// hashes the password and creates the account. The new user is not
/// logged in.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    validate_registration(&request.fields()).map_err(RegistrationError::Validation)?;

    if repo.username_exists(&request.username).await? {
        return Err(RegistrationError::UsernameExists);
    }

    let password_hash = hash_password(&request.password1)?;

    let mut new_user = NewUser::new(&request.username, password_hash)
        .with_name(request.first_name.trim(), request.last_name.trim());
    if let Some(email) = request.email.as_deref().filter(|e| !e.is_empty()) {
        new_user = new_user.with_email(email);
    }

    let user = repo.create(&new_user).await.map_err(|e| match e {
        // Lost a race with a concurrent registration.
        BlogError::Database(msg) if msg.contains("UNIQUE constraint failed") => {
            RegistrationError::UsernameExists
        }
        other => other.into(),
    })?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}
