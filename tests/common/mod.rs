//! Test helpers for web integration tests.
//!
//! Builds the router over an in-memory database and wraps the
//! register/login/create-post round trips.

#![allow(dead_code)]

use axum::http::header::AUTHORIZATION;
use axum_test::{TestResponse, TestServer};
use serde_json::Value;
use std::sync::Arc;

use quill::web::{create_router, AppState, JwtState};
use quill::{BlogService, Database};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";
pub const PASSWORD: &str = "correct-horse-9";

/// A running test app.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    /// Category IDs, in seeding order.
    pub categories: Vec<i64>,
}

/// Create a test server with two seeded categories and the given page size.
pub async fn create_test_app_with_page_size(paginate_by: u32) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let service = BlogService::new(&db);
    service
        .seed_categories(&["News".to_string(), "Travel".to_string()])
        .await
        .expect("Failed to seed categories");
    let categories = service
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();

    let app_state = Arc::new(AppState::new(db.clone(), JWT_SECRET, 900, paginate_by));
    let jwt_state = Arc::new(JwtState::new(JWT_SECRET));
    let router = create_router(app_state, jwt_state, &[]);

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        categories,
    }
}

/// Create a test server with the default page size.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_page_size(10).await
}

/// Register a user through the form.
pub async fn register_user(server: &TestServer, username: &str) -> TestResponse {
    server
        .post("/account/register")
        .form(&[
            ("username", username),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .await
}

/// Log in and return the access token.
pub async fn login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/account/login")
        .form(&[("username", username), ("password", PASSWORD)])
        .await;
    response.assert_status_ok();

    response.json::<Value>()["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Register then log in; returns the bearer token.
pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    register_user(server, username)
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    login(server, username).await
}

/// `Authorization` header value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Create a post through the form; returns its ID.
pub async fn create_post(server: &TestServer, token: &str, title: &str, category: i64) -> i64 {
    let response = server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(token))
        .form(&[
            ("title", title.to_string()),
            ("body", format!("Body of {title}")),
            ("category", category.to_string()),
        ])
        .await;
    response.assert_status(axum::http::StatusCode::SEE_OTHER);

    let location = response.header("location");
    location
        .to_str()
        .unwrap()
        .trim_start_matches("/posts/")
        .parse()
        .expect("redirect should point at the new post")
}
