//! JWT authentication middleware.
//!
//! A valid `Authorization: Bearer <token>` header identifies the user.
//! A missing or invalid token means an anonymous request, and so does a
//! token whose user has since been deleted or deactivated.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::Identity;
use crate::db::UserRepository;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{Database, Result};

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username.
    pub username: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

impl From<JwtClaims> for Identity {
    fn from(claims: JwtClaims) -> Self {
        Identity::new(claims.sub, claims.username)
    }
}

/// Application state for JWT authentication.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify a token and return its identity.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims.into()),
            Err(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                None
            }
        }
    }
}

fn identity_from_parts(parts: &Parts) -> Option<Identity> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .strip_prefix("Bearer ")?;

    parts.extensions.get::<Arc<JwtState>>()?.verify(token.trim())
}

/// Re-load the token's user; only an existing, active account counts.
async fn resolve_identity(parts: &Parts, db: &Database) -> Result<Option<Identity>> {
    let Some(claimed) = identity_from_parts(parts) else {
        return Ok(None);
    };

    let user = UserRepository::new(db.pool())
        .get_by_id(claimed.user_id)
        .await?;
    match user {
        Some(user) if user.is_active => Ok(Some(Identity::new(user.id, user.username))),
        _ => {
            tracing::debug!(user_id = claimed.user_id, "Token for missing or inactive user");
            Ok(None)
        }
    }
}

fn request_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// The requester's identity, if any. Rejects only when the user lookup fails.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    /// Borrow the identity.
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let app = Arc::<AppState>::from_ref(state);
        Ok(CurrentUser(resolve_identity(parts, &app.db).await?))
    }
}

/// Extractor for pages that need a logged-in user.
///
/// Anonymous requests are redirected to the login page with the current
/// path as `next`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let app = Arc::<AppState>::from_ref(state);
        resolve_identity(parts, &app.db)
            .await?
            .map(AuthUser)
            .ok_or_else(|| ApiError::login_required(&request_path(parts)))
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
