//! Quill - a small category blog.
//!
//! Categories, paginated post listings, owner-only editing and account
//! registration, served over HTTP.

pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    authenticate, hash_password, is_owner, register, require_login, require_owner,
    validate_password, verify_password, Identity, PasswordError, PermissionError,
    RegistrationError, RegistrationRequest, ValidationError,
};
pub use blog::{BlogService, Category, Post, PostDetail, PostInput, PostListing, PostUpdate};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{BlogError, Result};
pub use web::WebServer;
