//! Blog page handlers.
//!
//! Mutating pages take [`AuthUser`] first so anonymous visitors are sent
//! to the login page before anything else is looked at.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use validator::Validate;

use crate::blog::{validate_body, validate_title, BlogService, Post, PostInput};
use crate::BlogError;
use crate::web::dto::{
    CategoryResponse, DeleteContext, FormState, IndexContext, ListPostsQuery, PageMeta,
    PostDetailContext, PostForm, PostFormContext, PostResponse, PostsListContext,
    TemplateResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, CurrentUser};

use super::AppState;

/// Post ID from the path. A malformed ID is a JSON 400.
#[derive(Debug, serde::Deserialize, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct PostId(pub i64);

const ADD_TEMPLATE: &str = "blog/add_post.html";
const UPDATE_TEMPLATE: &str = "blog/update_post.html";

/// GET / - All categories.
pub async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<TemplateResponse<IndexContext>, ApiError> {
    let categories = BlogService::new(&state.db).list_categories().await?;

    Ok(TemplateResponse::new(
        "blog/index.html",
        IndexContext {
            categories_list: categories.into_iter().map(Into::into).collect(),
        },
    ))
}

/// GET /posts?category=<id>&page=<n> - Posts in one category.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<TemplateResponse<PostsListContext>, ApiError> {
    let listing = BlogService::new(&state.db)
        .list_posts(
            query.category.as_deref(),
            query.page.as_deref(),
            state.paginate_by,
        )
        .await?;

    let page = PageMeta::from(&listing.page);
    Ok(TemplateResponse::new(
        "blog/posts_list.html",
        PostsListContext {
            posts: listing.page.items.into_iter().map(Into::into).collect(),
            category: listing.category,
            page,
        },
    ))
}

/// GET /posts/:id - One post.
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    PostId(id): PostId,
) -> Result<TemplateResponse<PostDetailContext>, ApiError> {
    let detail = BlogService::new(&state.db)
        .post_detail(id, user.identity())
        .await?;

    Ok(TemplateResponse::new(
        "blog/post_details.html",
        PostDetailContext {
            post: detail.post.into(),
            user_has_permission: detail.user_has_permission,
        },
    ))
}

fn form_values(form: &PostForm) -> FormState {
    FormState::with_values([
        ("title", form.title.clone()),
        ("body", form.body.clone()),
        ("category", form.category.clone()),
    ])
}

fn post_values(post: &Post) -> FormState {
    FormState::with_values([
        ("title", post.title.clone()),
        ("body", post.body.clone()),
        ("category", post.category_id.to_string()),
    ])
}

/// Validate a submitted post form, including that the category exists.
///
/// On failure the returned state carries the submitted values and errors.
async fn check_post_form(
    service: &BlogService<'_>,
    form: &PostForm,
) -> Result<Result<PostInput, FormState>, ApiError> {
    let mut form_state = form_values(form);
    if let Err(errors) = form.validate() {
        form_state.add_validator_errors(&errors);
    }

    // Length limits live with the service; report them against the field.
    for check in [validate_title(&form.title), validate_body(&form.body)] {
        if let Err(BlogError::Validation(message)) = check {
            if let Some((field, message)) = message.split_once(": ") {
                if !form_state.errors.contains_key(field) {
                    form_state.add_error(field, message);
                }
            }
        }
    }

    if let Some(category_id) = form.category_id() {
        if service.get_category(category_id).await?.is_none() {
            form_state.add_error("category", "Select a valid choice");
        }
    }

    match form.to_input() {
        Some(input) if !form_state.has_errors() => Ok(Ok(input)),
        _ => Ok(Err(form_state)),
    }
}

async fn form_page(
    service: &BlogService<'_>,
    template: &'static str,
    form: FormState,
    post: Option<Post>,
) -> Result<TemplateResponse<PostFormContext>, ApiError> {
    let categories: Vec<CategoryResponse> = service
        .list_categories()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(TemplateResponse::new(
        template,
        PostFormContext {
            form,
            categories,
            post: post.map(PostResponse::from),
        },
    ))
}

async fn invalid_form_page(
    service: &BlogService<'_>,
    template: &'static str,
    form: FormState,
    post: Option<Post>,
) -> Result<Response, ApiError> {
    let error = ApiError::validation(form.errors.clone());
    Ok(form_page(service, template, form, post)
        .await?
        .with_error(error)
        .into_response())
}

/// GET /posts/add - Empty post form.
pub async fn add_post_page(
    State(state): State<Arc<AppState>>,
    AuthUser(_who): AuthUser,
) -> Result<TemplateResponse<PostFormContext>, ApiError> {
    let service = BlogService::new(&state.db);
    form_page(&service, ADD_TEMPLATE, FormState::default(), None).await
}

/// POST /posts/add - Create a post owned by the requester.
pub async fn add_post(
    State(state): State<Arc<AppState>>,
    AuthUser(who): AuthUser,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let service = BlogService::new(&state.db);

    let input = match check_post_form(&service, &form).await? {
        Ok(input) => input,
        Err(form_state) => {
            return invalid_form_page(&service, ADD_TEMPLATE, form_state, None).await;
        }
    };

    let post = service.create_post(Some(&who), input).await?;
    Ok(Redirect::to(&post.absolute_url()).into_response())
}

/// GET /posts/:id/update - Form pre-filled from the post.
pub async fn update_post_page(
    State(state): State<Arc<AppState>>,
    AuthUser(who): AuthUser,
    PostId(id): PostId,
) -> Result<TemplateResponse<PostFormContext>, ApiError> {
    let service = BlogService::new(&state.db);
    let post = service.owned_post(id, Some(&who)).await?;
    form_page(&service, UPDATE_TEMPLATE, post_values(&post), Some(post)).await
}

/// POST /posts/:id/update - Save changes to an owned post.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    AuthUser(who): AuthUser,
    PostId(id): PostId,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let service = BlogService::new(&state.db);
    let post = service.owned_post(id, Some(&who)).await?;

    let input = match check_post_form(&service, &form).await? {
        Ok(input) => input,
        Err(form_state) => {
            return invalid_form_page(&service, UPDATE_TEMPLATE, form_state, Some(post)).await;
        }
    };

    let post = service.update_post(id, Some(&who), input).await?;
    Ok(Redirect::to(&post.absolute_url()).into_response())
}

/// GET /posts/:id/delete - Confirmation page.
pub async fn delete_post_page(
    State(state): State<Arc<AppState>>,
    AuthUser(who): AuthUser,
    PostId(id): PostId,
) -> Result<TemplateResponse<DeleteContext>, ApiError> {
    let post = BlogService::new(&state.db)
        .owned_post(id, Some(&who))
        .await?;

    Ok(TemplateResponse::new(
        "blog/delete_post.html",
        DeleteContext { post: post.into() },
    ))
}

/// POST /posts/:id/delete - Delete an owned post.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(who): AuthUser,
    PostId(id): PostId,
) -> Result<Response, ApiError> {
    BlogService::new(&state.db)
        .delete_post(id, Some(&who))
        .await?;

    Ok(Redirect::to("/").into_response())
}
