//! Authorization guards for Quill.
//!
//! Every mutating operation runs one of these guards before touching
//! storage. A guard returns `Ok` to allow or a `PermissionError` to deny.

use thiserror::Error;

use crate::BlogError;

/// The authenticated principal behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User ID.
    pub user_id: i64,
    /// Username at the time the token was issued.
    pub username: String,
}

impl Identity {
    /// Create an identity.
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Reasons a guard denies a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// No authenticated identity.
    #[error("login required")]
    NotAuthenticated,

    /// Authenticated, but not the owner of the resource.
    #[error("only the owner may modify this {0}")]
    NotOwner(&'static str),
}

impl From<PermissionError> for BlogError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::NotAuthenticated => BlogError::LoginRequired,
            PermissionError::NotOwner(_) => BlogError::Permission(e.to_string()),
        }
    }
}

/// Require an authenticated identity.
///
/// # Examples
///
/// ```
/// use quill::auth::{require_login, Identity, PermissionError};
///
/// assert_eq!(require_login(None), Err(PermissionError::NotAuthenticated));
///
/// let alice = Identity::new(1, "alice");
/// assert_eq!(require_login(Some(&alice)), Ok(&alice));
/// ```
pub fn require_login(identity: Option<&Identity>) -> Result<&Identity, PermissionError> {
    identity.ok_or(PermissionError::NotAuthenticated)
}

/// Check ownership without failing.
///
/// True iff there is an identity and it is the owner. Used for display
/// decisions only; access control goes through [`require_owner`].
pub fn is_owner(identity: Option<&Identity>, owner_id: i64) -> bool {
    identity.is_some_and(|who| who.user_id == owner_id)
}

/// Require that the identity owns the resource.
///
/// `what` names the resource in the error message.
pub fn require_owner(
    identity: Option<&Identity>,
    owner_id: i64,
    what: &'static str,
) -> Result<(), PermissionError> {
    let who = require_login(identity)?;
    if who.user_id != owner_id {
        return Err(PermissionError::NotOwner(what));
    }
    Ok(())
}
