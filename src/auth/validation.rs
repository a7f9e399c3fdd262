//! Input validation for Quill user registration.
//!
//! Each check returns the first problem it finds for its field;
//! [`validate_registration`] collects one error per failing field so the
//! form can show them all at once.

use thiserror::Error;

use super::password::{self, PasswordError, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length of `first_name` and `last_name`.
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username may contain only letters, digits and @/./+/-/_ characters")]
    UsernameInvalidChars,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password is digits only.
    #[error("password cannot be entirely numeric")]
    PasswordEntirelyNumeric,

    /// Password is the same as username.
    #[error("password is too similar to the username")]
    PasswordSameAsUsername,

    /// The confirmation does not match.
    #[error("the two password fields didn't match")]
    PasswordMismatch,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("enter a valid email address")]
    EmailInvalidFormat,

    /// First name is too long.
    #[error("first name must be at most {MAX_NAME_LENGTH} characters")]
    FirstNameTooLong,

    /// Last name is too long.
    #[error("last name must be at most {MAX_NAME_LENGTH} characters")]
    LastNameTooLong,
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameTooShort | Self::UsernameTooLong | Self::UsernameInvalidChars => {
                "username"
            }
            Self::PasswordTooShort
            | Self::PasswordTooLong
            | Self::PasswordEntirelyNumeric
            | Self::PasswordSameAsUsername => "password1",
            Self::PasswordMismatch => "password2",
            Self::EmailTooLong | Self::EmailInvalidFormat => "email",
            Self::FirstNameTooLong => "first_name",
            Self::LastNameTooLong => "last_name",
        }
    }
}

/// Validate a username.
///
/// Requirements:
/// - Length: 3-150 characters
/// - Characters: letters, digits and `@ . + - _`
///
/// # Examples
///
/// ```
/// use quill::auth::validation::validate_username;
///
/// assert!(validate_username("john.doe+blog@home").is_ok());
/// assert!(validate_username("ab").is_err());
/// assert!(validate_username("john doe").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }

    Ok(())
}

/// Validate a registration password against the strength rules and the
/// chosen username.
pub fn validate_registration_password(
    password: &str,
    username: Option<&str>,
) -> Result<(), ValidationError> {
    password::validate_password(password).map_err(|e| match e {
        PasswordError::TooShort => ValidationError::PasswordTooShort,
        PasswordError::TooLong => ValidationError::PasswordTooLong,
        _ => ValidationError::PasswordEntirelyNumeric,
    })?;

    if let Some(user) = username {
        if password.to_lowercase() == user.to_lowercase() {
            return Err(ValidationError::PasswordSameAsUsername);
        }
    }

    Ok(())
}

/// Validate an email address (optional field).
///
/// Empty is accepted. Otherwise the address needs exactly one `@`, a
/// non-empty local part, a dotted domain and no whitespace.
///
/// # Examples
///
/// ```
/// use quill::auth::validation::validate_email;
///
/// assert!(validate_email("").is_ok());
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if domain.split('.').any(str::is_empty) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

fn validate_name(name: &str, too_long: ValidationError) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(too_long);
    }
    Ok(())
}

/// Registration fields as submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationFields<'a> {
    pub username: &'a str,
    pub password1: &'a str,
    pub password2: &'a str,
    pub email: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Validate all registration fields at once.
///
/// Returns every failing field's first error, in form order.
pub fn validate_registration(fields: &RegistrationFields<'_>) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let username_ok = match validate_username(fields.username) {
        Ok(()) => true,
        Err(e) => {
            errors.push(e);
            false
        }
    };

    let username = username_ok.then_some(fields.username);
    if let Err(e) = validate_registration_password(fields.password1, username) {
        errors.push(e);
    }
    if fields.password1 != fields.password2 {
        errors.push(ValidationError::PasswordMismatch);
    }

    if let Some(email) = fields.email {
        if let Err(e) = validate_email(email) {
            errors.push(e);
        }
    }
    if let Err(e) = validate_name(fields.first_name, ValidationError::FirstNameTooLong) {
        errors.push(e);
    }
    if let Err(e) = validate_name(fields.last_name, ValidationError::LastNameTooLong) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
