//! Authentication module for Quill.
//!
//! This module provides password hashing, user registration, credential
//! checks and the ownership guards used by the blog handlers.

mod login;
mod password;
mod permission;
mod registration;
pub mod validation;

pub use login::{authenticate, INVALID_CREDENTIALS};
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use permission::{is_owner, require_login, require_owner, Identity, PermissionError};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use validation::ValidationError;
