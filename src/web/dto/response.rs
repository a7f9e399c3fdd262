//! Response DTOs for the web layer.
//!
//! Every page answers with the name of the template that would render it
//! and the context it would be rendered with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::validation::FormState;
use crate::blog::{Category, Page, Post};
use crate::db::User;
use crate::web::error::{ApiError, ErrorDetail};

// ============================================================================
// Page Wrapper
// ============================================================================

/// A page: template name plus context.
#[derive(Debug, Serialize)]
pub struct TemplateResponse<C: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    /// Template name.
    pub template: &'static str,
    /// Template context.
    pub context: C,
    /// Present when the page is a form redisplayed with errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl<C: Serialize> TemplateResponse<C> {
    /// A 200 page.
    pub fn new(template: &'static str, context: C) -> Self {
        Self {
            status: StatusCode::OK,
            template,
            context,
            error: None,
        }
    }

    /// Override the status code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attach an error; the status follows the error's code.
    pub fn with_error(mut self, error: ApiError) -> Self {
        self.status = error.code().status_code();
        self.error = Some(error.detail());
        self
    }
}

impl<C: Serialize> IntoResponse for TemplateResponse<C> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

// ============================================================================
// Blog DTOs
// ============================================================================

/// Category response.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i64,
    /// Category name.
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// Author information.
#[derive(Debug, Serialize)]
pub struct AuthorInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
}

/// Post response.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Post ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Detail page URL.
    pub url: String,
    /// Owner.
    pub author: AuthorInfo,
    /// Category.
    pub category: CategoryResponse,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            url: p.absolute_url(),
            id: p.id,
            title: p.title,
            body: p.body,
            author: AuthorInfo {
                id: p.owner_id,
                username: p.owner_username,
            },
            category: CategoryResponse {
                id: p.category_id,
                name: p.category_name,
            },
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    /// Current page number (1-based).
    pub number: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
    /// Number of pages.
    pub num_pages: i64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_previous: bool,
}

impl<T> From<&Page<T>> for PageMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            per_page: page.per_page,
            total: page.total,
            num_pages: page.num_pages,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

/// Context of `blog/index.html`.
#[derive(Debug, Serialize)]
pub struct IndexContext {
    /// All categories.
    pub categories_list: Vec<CategoryResponse>,
}

/// Context of `blog/posts_list.html`.
#[derive(Debug, Serialize)]
pub struct PostsListContext {
    /// Posts on this page.
    pub posts: Vec<PostResponse>,
    /// Category filter as interpreted.
    pub category: Option<i64>,
    /// Pagination.
    pub page: PageMeta,
}

/// Context of `blog/post_details.html`.
#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    /// The post.
    pub post: PostResponse,
    /// Whether the viewer owns the post.
    pub user_has_permission: bool,
}

/// Context of `blog/add_post.html` and `blog/update_post.html`.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    /// Form values and errors.
    pub form: FormState,
    /// Categories to choose from.
    pub categories: Vec<CategoryResponse>,
    /// The post being edited (update only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostResponse>,
}

/// Context of `blog/delete_post.html`.
#[derive(Debug, Serialize)]
pub struct DeleteContext {
    /// The post to delete.
    pub post: PostResponse,
}

// ============================================================================
// Account DTOs
// ============================================================================

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
        }
    }
}

/// Context of `account/registration.html`.
#[derive(Debug, Serialize)]
pub struct RegistrationContext {
    /// Form values and errors.
    pub form: FormState,
    /// The new user, after a successful registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

/// Context of `account/login.html`.
#[derive(Debug, Serialize)]
pub struct LoginContext {
    /// Form values and errors.
    pub form: FormState,
    /// Where to go after logging in.
    pub next: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    /// Where to go next.
    pub next: String,
    /// User information.
    pub user: UserInfo,
}
