//! Post model for Quill.
//!
//! Posts are always read together with their owner's username and their
//! category's name, so the joined columns live on the model itself.

/// Post entity as read from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// ID of the user who created the post. Never changes after creation.
    pub owner_id: i64,
    /// Username of the owner.
    pub owner_username: String,
    /// ID of the category the post is filed under.
    pub category_id: i64,
    /// Name of the category.
    pub category_name: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
}

impl Post {
    /// Canonical detail URL for this post.
    pub fn absolute_url(&self) -> String {
        post_url(self.id)
    }
}

/// Canonical detail URL for a post ID.
pub fn post_url(id: i64) -> String {
    format!("/posts/{id}")
}

/// Data for creating a new post.
///
/// The owner is not part of the input: the service stamps it from the
/// acting identity.
#[derive(Debug, Clone)]
pub struct PostInput {
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Category ID.
    pub category_id: i64,
}

impl PostInput {
    /// Create a new post input.
    pub fn new(title: impl Into<String>, body: impl Into<String>, category_id: i64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category_id,
        }
    }
}

/// Data for updating an existing post.
///
/// The owner cannot be changed through an update.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New category.
    pub category_id: Option<i64>,
}

impl PostUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set new body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set new category.
    pub fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.category_id.is_none()
    }
}

impl From<PostInput> for PostUpdate {
    fn from(input: PostInput) -> Self {
        Self {
            title: Some(input.title),
            body: Some(input.body),
            category_id: Some(input.category_id),
        }
    }
}
