//! Error types for Quill.

use thiserror::Error;

/// Common error type for Quill.
#[derive(Error, Debug)]
pub enum BlogError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant and are not
    /// recovered locally.
    #[error("database error: {0}")]
    Database(String),

    /// Migration error while opening the database.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The operation needs an authenticated user and there is none.
    #[error("login required")]
    LoginRequired,

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BlogError {
    fn from(e: sqlx::Error) -> Self {
        BlogError::Database(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for BlogError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        BlogError::Migration(e.to_string())
    }
}

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = BlogError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_permission_error_display() {
        let err = BlogError::Permission("not the owner".to_string());
        assert_eq!(err.to_string(), "permission denied: not the owner");
    }

    #[test]
    fn test_login_required_display() {
        assert_eq!(BlogError::LoginRequired.to_string(), "login required");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = BlogError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BlogError = io_err.into();
        assert!(matches!(err, BlogError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: BlogError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, BlogError::Database(_)));
    }
}
