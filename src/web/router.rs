//! Router configuration for the web layer.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_post, add_post_page, delete_post, delete_post_page, index, list_posts, login, login_page,
    post_detail, register, register_page, update_post, update_post_page, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let blog_routes = Router::new()
        .route("/", get(index))
        .route("/posts", get(list_posts))
        .route("/posts/add", get(add_post_page).post(add_post))
        .route("/posts/:id", get(post_detail))
        .route("/posts/:id/update", get(update_post_page).post(update_post))
        .route("/posts/:id/delete", get(delete_post_page).post(delete_post));

    let account_routes = Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login));

    Router::new()
        .merge(blog_routes)
        .nest("/account", account_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
