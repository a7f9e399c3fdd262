//! Credential checks for Quill.

use tracing::{info, warn};

use crate::auth::verify_password;
use crate::db::{User, UserRepository};
use crate::{BlogError, Result};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Check a username/password pair.
///
/// Unknown users, wrong passwords and disabled accounts all produce the
/// same `BlogError::Auth` so callers cannot tell them apart.
pub async fn authenticate(repo: &UserRepository<'_>, username: &str, password: &str) -> Result<User> {
    let Some(user) = repo.get_by_username(username).await? else {
        warn!(username = %username, "Login failed: unknown user");
        return Err(BlogError::Auth(INVALID_CREDENTIALS.to_string()));
    };

    if verify_password(password, &user.password).is_err() {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(BlogError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    if !user.is_active {
        warn!(user_id = user.id, "Login failed: account disabled");
        return Err(BlogError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(user)
}
