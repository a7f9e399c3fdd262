//! Account handlers: registration and login.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{authenticate, register as register_user, RegistrationError, INVALID_CREDENTIALS};
use crate::db::UserRepository;
use crate::web::dto::{
    FormState, LoginContext, LoginForm, LoginQuery, LoginResponse, RegisterForm,
    RegistrationContext, TemplateResponse, UserInfo,
};
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;
use crate::{BlogError, Database};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub access_token_expiry: u64,
    /// Posts per listing page.
    pub paginate_by: u32,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, jwt_secret: &str, access_expiry: u64, paginate_by: u32) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_token_expiry: access_expiry,
            paginate_by,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, username: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}

/// Only same-site absolute paths are accepted as `next`.
fn safe_next(next: &str) -> String {
    let next = next.trim();
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        next.to_string()
    } else {
        "/".to_string()
    }
}

const REGISTRATION_TEMPLATE: &str = "account/registration.html";
const LOGIN_TEMPLATE: &str = "account/login.html";

/// GET /account/register - Empty registration form.
pub async fn register_page() -> TemplateResponse<RegistrationContext> {
    TemplateResponse::new(
        REGISTRATION_TEMPLATE,
        RegistrationContext {
            form: FormState::default(),
            user: None,
        },
    )
}

/// POST /account/register - Create an account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    // Passwords are never echoed back.
    let mut form_state = FormState::with_values([
        ("username", form.username.clone()),
        ("email", form.email.clone()),
        ("first_name", form.first_name.clone()),
        ("last_name", form.last_name.clone()),
    ]);

    let repo = UserRepository::new(state.db.pool());
    match register_user(&repo, form.into()).await {
        Ok(user) => Ok(TemplateResponse::new(
            REGISTRATION_TEMPLATE,
            RegistrationContext {
                form: FormState::default(),
                user: Some(UserInfo::from(user)),
            },
        )
        .with_status(StatusCode::CREATED)
        .into_response()),
        Err(e @ (RegistrationError::Validation(_) | RegistrationError::UsernameExists)) => {
            for (field, message) in e.field_errors() {
                form_state.add_error(field, message);
            }
            let error = ApiError::validation(form_state.errors.clone());
            Ok(TemplateResponse::new(
                REGISTRATION_TEMPLATE,
                RegistrationContext {
                    form: form_state,
                    user: None,
                },
            )
            .with_error(error)
            .into_response())
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            Err(ApiError::internal("Failed to create account"))
        }
    }
}

/// GET /account/login - Login form.
pub async fn login_page(Query(query): Query<LoginQuery>) -> TemplateResponse<LoginContext> {
    let next = safe_next(query.next.as_deref().unwrap_or("/"));
    TemplateResponse::new(
        LOGIN_TEMPLATE,
        LoginContext {
            form: FormState::default(),
            next,
        },
    )
}

/// POST /account/login - Exchange credentials for an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        let mut errors = FormState::default();
        if form.username.trim().is_empty() {
            errors.add_error("username", "This field is required");
        }
        if form.password.is_empty() {
            errors.add_error("password", "This field is required");
        }
        return Err(ApiError::validation(errors.errors));
    }

    let repo = UserRepository::new(state.db.pool());
    let user = authenticate(&repo, form.username.trim(), &form.password)
        .await
        .map_err(|e| match e {
            BlogError::Auth(_) => ApiError::unauthorized(INVALID_CREDENTIALS),
            other => ApiError::from(other),
        })?;

    let access_token = state.generate_access_token(user.id, &user.username)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.access_token_expiry,
        next: safe_next(&form.next),
        user: user.into(),
    }))
}
