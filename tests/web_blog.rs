//! Web Blog Tests
//!
//! Integration tests for the category, listing, detail and post editing pages.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use quill::blog::{MAX_BODY_LENGTH, MAX_TITLE_LENGTH};
use quill::UserRepository;
use serde_json::Value;

use common::{bearer, create_post, create_test_app, create_test_app_with_page_size, register_and_login};

// ============================================================================
// Category Listing
// ============================================================================

#[tokio::test]
async fn test_index_lists_categories_in_order() {
    let app = create_test_app().await;

    let response = app.server.get("/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["template"], "blog/index.html");
    let names: Vec<&str> = body["context"]["categories_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["News", "Travel"]);
}

// ============================================================================
// Post Listing
// ============================================================================

#[tokio::test]
async fn test_list_posts_filters_by_category() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;
    let (news, travel) = (app.categories[0], app.categories[1]);

    let a = create_post(&app.server, &token, "A", news).await;
    create_post(&app.server, &token, "B", travel).await;

    let response = app
        .server
        .get("/posts")
        .add_query_param("category", news)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["template"], "blog/posts_list.html");
    assert_eq!(body["context"]["category"], news);
    let posts = body["context"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], a);
    assert_eq!(posts[0]["author"]["username"], "alice");
}

#[tokio::test]
async fn test_list_posts_without_valid_category_is_empty() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;
    create_post(&app.server, &token, "A", app.categories[0]).await;

    for query in ["/posts", "/posts?category=", "/posts?category=news", "/posts?category=999"] {
        let response = app.server.get(query).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(
            body["context"]["posts"].as_array().unwrap().is_empty(),
            "{query}"
        );
        assert_eq!(body["context"]["page"]["number"], 1);
        assert_eq!(body["context"]["page"]["num_pages"], 1);
    }
}

#[tokio::test]
async fn test_list_posts_pagination() {
    let app = create_test_app_with_page_size(1).await;
    let token = register_and_login(&app.server, "alice").await;
    let news = app.categories[0];

    for title in ["first", "second", "third"] {
        create_post(&app.server, &token, title, news).await;
    }

    let response = app
        .server
        .get(&format!("/posts?category={news}&page=2"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["context"]["posts"][0]["title"], "second");
    assert_eq!(body["context"]["page"]["num_pages"], 3);
    assert_eq!(body["context"]["page"]["has_next"], true);
    assert_eq!(body["context"]["page"]["has_previous"], true);

    let body: Value = app
        .server
        .get(&format!("/posts?category={news}&page=last"))
        .await
        .json();
    assert_eq!(body["context"]["posts"][0]["title"], "third");
    assert_eq!(body["context"]["page"]["has_next"], false);

    for page in ["0", "4", "abc"] {
        app.server
            .get(&format!("/posts?category={news}&page={page}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Post Detail
// ============================================================================

#[tokio::test]
async fn test_post_detail_permission_flag() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let id = create_post(&app.server, &alice, "Hello", app.categories[0]).await;
    let url = format!("/posts/{id}");

    let body: Value = app
        .server
        .get(&url)
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .json();
    assert_eq!(body["template"], "blog/post_details.html");
    assert_eq!(body["context"]["post"]["title"], "Hello");
    assert_eq!(body["context"]["post"]["url"], url);
    assert_eq!(body["context"]["user_has_permission"], true);

    let body: Value = app
        .server
        .get(&url)
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .json();
    assert_eq!(body["context"]["user_has_permission"], false);

    let body: Value = app.server.get(&url).await.json();
    assert_eq!(body["context"]["user_has_permission"], false);

    // A bad token is treated as anonymous.
    let body: Value = app
        .server
        .get(&url)
        .add_header(AUTHORIZATION, "Bearer not-a-jwt".to_string())
        .await
        .json();
    assert_eq!(body["context"]["user_has_permission"], false);
}

#[tokio::test]
async fn test_post_detail_not_found() {
    let app = create_test_app().await;

    let response = app.server.get("/posts/999").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_post_id_is_bad_request() {
    let app = create_test_app().await;

    let response = app.server.get("/posts/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Login is still checked first on owner-only pages.
    app.server
        .get("/posts/abc/update")
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let token = register_and_login(&app.server, "alice").await;
    let response = app
        .server
        .post("/posts/abc/delete")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// ============================================================================
// Post Creation
// ============================================================================

#[tokio::test]
async fn test_add_post_requires_login() {
    let app = create_test_app().await;

    let response = app.server.get("/posts/add").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "/account/login?next=%2Fposts%2Fadd"
    );

    let response = app
        .server
        .post("/posts/add")
        .form(&[("title", "T"), ("body", "B"), ("category", "1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let body: Value = app
        .server
        .get(&format!("/posts?category={}", app.categories[0]))
        .await
        .json();
    assert!(body["context"]["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_post_form_page() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .get("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["template"], "blog/add_post.html");
    assert_eq!(body["context"]["categories"].as_array().unwrap().len(), 2);
    assert!(body["context"].get("post").is_none());
}

#[tokio::test]
async fn test_add_post_sets_owner_and_redirects() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[
            ("title", "Owned".to_string()),
            ("body", "by alice".to_string()),
            ("category", app.categories[1].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    let location = response.header("location");
    let location = location.to_str().unwrap();
    assert!(location.starts_with("/posts/"));

    let body: Value = app.server.get(location).await.json();
    assert_eq!(body["context"]["post"]["author"]["username"], "alice");
    assert_eq!(body["context"]["post"]["category"]["name"], "Travel");
}

#[tokio::test]
async fn test_deactivated_user_token_is_anonymous() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;
    let id = create_post(&app.server, &token, "Before", app.categories[0]).await;

    let repo = UserRepository::new(app.db.pool());
    let alice = repo.get_by_username("alice").await.unwrap().unwrap();
    repo.set_active(alice.id, false).await.unwrap();

    let response = app
        .server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[
            ("title", "After".to_string()),
            ("body", "should not be saved".to_string()),
            ("category", app.categories[0].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "/account/login?next=%2Fposts%2Fadd"
    );

    let body: Value = app
        .server
        .get(&format!("/posts?category={}", app.categories[0]))
        .await
        .json();
    assert_eq!(body["context"]["posts"].as_array().unwrap().len(), 1);

    // Ownership no longer grants access either.
    let body: Value = app
        .server
        .get(&format!("/posts/{id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(body["context"]["user_has_permission"], false);

    app.server
        .post(&format!("/posts/{id}/delete"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::SEE_OTHER);
    app.server
        .get(&format!("/posts/{id}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_deleted_user_token_redirects_to_login() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;

    sqlx::query("DELETE FROM users WHERE username = 'alice'")
        .execute(app.db.pool())
        .await
        .unwrap();

    let response = app
        .server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[
            ("title", "Orphan".to_string()),
            ("body", "no owner".to_string()),
            ("category", app.categories[0].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        "/account/login?next=%2Fposts%2Fadd"
    );
}

#[tokio::test]
async fn test_add_post_invalid_form_redisplays() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[("title", "  "), ("body", "kept body"), ("category", "999")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["template"], "blog/add_post.html");
    assert_eq!(body["context"]["form"]["values"]["body"], "kept body");
    assert!(body["context"]["form"]["errors"]["title"].is_array());
    assert!(body["context"]["form"]["errors"]["category"].is_array());
    assert!(body["context"]["form"]["errors"].get("body").is_none());
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_add_post_too_long_fields() {
    let app = create_test_app().await;
    let token = register_and_login(&app.server, "alice").await;
    let category = app.categories[0].to_string();

    let response = app
        .server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[
            ("title", "t".repeat(MAX_TITLE_LENGTH + 1)),
            ("body", "b".repeat(MAX_BODY_LENGTH + 1)),
            ("category", category.clone()),
        ])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    let errors = &body["context"]["form"]["errors"];
    assert_eq!(
        errors["title"][0],
        format!("must be at most {MAX_TITLE_LENGTH} characters")
    );
    assert_eq!(
        errors["body"][0],
        format!("must be at most {MAX_BODY_LENGTH} characters")
    );

    // Exactly at the limit is accepted.
    app.server
        .post("/posts/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .form(&[
            ("title", "t".repeat(MAX_TITLE_LENGTH)),
            ("body", "b".repeat(MAX_BODY_LENGTH)),
            ("category", category),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);
}

// ============================================================================
// Post Update
// ============================================================================

#[tokio::test]
async fn test_update_requires_login_before_lookup() {
    let app = create_test_app().await;

    for path in ["/posts/1/update", "/posts/999/update"] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header("location");
        assert!(location.to_str().unwrap().starts_with("/account/login?next="));
    }
}

#[tokio::test]
async fn test_update_unauthenticated_does_not_mutate() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let id = create_post(&app.server, &alice, "Original", app.categories[0]).await;

    let response = app
        .server
        .post(&format!("/posts/{id}/update"))
        .form(&[
            ("title", "Hijacked".to_string()),
            ("body", "x".to_string()),
            ("category", app.categories[0].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.header("location"),
        format!("/account/login?next=%2Fposts%2F{id}%2Fupdate").as_str()
    );

    let body: Value = app.server.get(&format!("/posts/{id}")).await.json();
    assert_eq!(body["context"]["post"]["title"], "Original");
}

#[tokio::test]
async fn test_update_by_non_owner_is_forbidden() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let id = create_post(&app.server, &alice, "Original", app.categories[0]).await;

    app.server
        .get(&format!("/posts/{id}/update"))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post(&format!("/posts/{id}/update"))
        .add_header(AUTHORIZATION, bearer(&bob))
        .form(&[
            ("title", "Hijacked".to_string()),
            ("body", "x".to_string()),
            ("category", app.categories[0].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let body: Value = app.server.get(&format!("/posts/{id}")).await.json();
    assert_eq!(body["context"]["post"]["title"], "Original");
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;

    app.server
        .get("/posts/999/update")
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_by_owner() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let id = create_post(&app.server, &alice, "Original", app.categories[0]).await;

    let body: Value = app
        .server
        .get(&format!("/posts/{id}/update"))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .json();
    assert_eq!(body["template"], "blog/update_post.html");
    assert_eq!(body["context"]["form"]["values"]["title"], "Original");
    assert_eq!(body["context"]["post"]["id"], id);

    let response = app
        .server
        .post(&format!("/posts/{id}/update"))
        .add_header(AUTHORIZATION, bearer(&alice))
        .form(&[
            ("title", "Edited".to_string()),
            ("body", "New body".to_string()),
            ("category", app.categories[1].to_string()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), format!("/posts/{id}").as_str());

    let body: Value = app.server.get(&format!("/posts/{id}")).await.json();
    assert_eq!(body["context"]["post"]["title"], "Edited");
    assert_eq!(body["context"]["post"]["category"]["name"], "Travel");
    assert_eq!(body["context"]["post"]["author"]["username"], "alice");
}

#[tokio::test]
async fn test_update_invalid_form_keeps_post() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let id = create_post(&app.server, &alice, "Original", app.categories[0]).await;

    let response = app
        .server
        .post(&format!("/posts/{id}/update"))
        .add_header(AUTHORIZATION, bearer(&alice))
        .form(&[("title", "Edited"), ("body", ""), ("category", "")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["template"], "blog/update_post.html");
    assert_eq!(body["context"]["post"]["title"], "Original");

    let body: Value = app.server.get(&format!("/posts/{id}")).await.json();
    assert_eq!(body["context"]["post"]["title"], "Original");
}

// ============================================================================
// Post Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_unauthenticated_and_non_owner() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let bob = register_and_login(&app.server, "bob").await;
    let id = create_post(&app.server, &alice, "Keep me", app.categories[0]).await;
    let path = format!("/posts/{id}/delete");

    app.server
        .post(&path)
        .await
        .assert_status(StatusCode::SEE_OTHER);
    app.server
        .post(&path)
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get(&format!("/posts/{id}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_by_owner() {
    let app = create_test_app().await;
    let alice = register_and_login(&app.server, "alice").await;
    let id = create_post(&app.server, &alice, "Bye", app.categories[0]).await;
    let path = format!("/posts/{id}/delete");

    let body: Value = app
        .server
        .get(&path)
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .json();
    assert_eq!(body["template"], "blog/delete_post.html");
    assert_eq!(body["context"]["post"]["title"], "Bye");

    let response = app
        .server
        .post(&path)
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    app.server
        .get(&format!("/posts/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
