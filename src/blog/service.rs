//! Blog service for Quill.
//!
//! One method per blog operation. Methods that mutate a post run the
//! ownership guards from [`crate::auth`] before touching storage.

use tracing::{debug, info};

use crate::auth::{is_owner, require_login, require_owner, Identity};
use crate::db::Database;
use crate::{BlogError, Result};

use super::category::Category;
use super::category_repository::CategoryRepository;
use super::pagination::{Page, PageNumber, Paginator};
use super::post::{Post, PostInput, PostUpdate};
use super::post_repository::PostRepository;

/// Maximum length for post titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for post bodies (in characters).
pub const MAX_BODY_LENGTH: usize = 10_000;

fn has_forbidden_control(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}

/// Validate a post title.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(BlogError::Validation("title: this field is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(BlogError::Validation(format!(
            "title: must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    if has_forbidden_control(title) {
        return Err(BlogError::Validation(
            "title: contains invalid control characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate a post body.
pub fn validate_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(BlogError::Validation("body: this field is required".to_string()));
    }
    if body.chars().count() > MAX_BODY_LENGTH {
        return Err(BlogError::Validation(format!(
            "body: must be at most {MAX_BODY_LENGTH} characters"
        )));
    }
    if has_forbidden_control(body) {
        return Err(BlogError::Validation(
            "body: contains invalid control characters".to_string(),
        ));
    }
    Ok(())
}

/// Interpret a raw `category` query value.
///
/// Anything that is not an integer becomes `None`, which the listing
/// treats as "matches nothing".
pub fn parse_category_filter(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// A page of posts together with the filter that produced it.
#[derive(Debug, Clone)]
pub struct PostListing {
    /// The category filter as interpreted.
    pub category: Option<i64>,
    /// The requested page.
    pub page: Page<Post>,
}

/// A post plus the viewer's rights on it.
#[derive(Debug, Clone)]
pub struct PostDetail {
    /// The post.
    pub post: Post,
    /// Whether the viewer owns the post. Advisory only.
    pub user_has_permission: bool,
}

/// Service for blog operations with permission checking.
pub struct BlogService<'a> {
    db: &'a Database,
}

impl<'a> BlogService<'a> {
    /// Create a new BlogService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn posts(&self) -> PostRepository<'_> {
        PostRepository::new(self.db.pool())
    }

    fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(self.db.pool())
    }

    /// Create any configured categories that do not exist yet.
    ///
    /// Returns the number of categories now present from `names`.
    pub async fn seed_categories(&self, names: &[String]) -> Result<usize> {
        let repo = self.categories();
        let mut seeded = 0;
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let category = repo.ensure(name).await?;
            debug!(category_id = category.id, name = %category.name, "Category ready");
            seeded += 1;
        }
        Ok(seeded)
    }

    /// List all categories in insertion order.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories().list_all().await
    }

    /// Look up a category by ID.
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.categories().get_by_id(id).await
    }

    /// List one page of posts filtered by category.
    ///
    /// `raw_category` and `raw_page` are the query values as received.
    pub async fn list_posts(
        &self,
        raw_category: Option<&str>,
        raw_page: Option<&str>,
        per_page: u32,
    ) -> Result<PostListing> {
        let category = parse_category_filter(raw_category);
        let requested = PageNumber::parse_optional(raw_page)?;

        let repo = self.posts();
        let total = repo.count_by_category(category).await?;
        let paginator = Paginator::new(per_page, total);
        let number = paginator.resolve(requested)?;

        let items = repo
            .list_by_category(category, paginator.offset(number), paginator.per_page())
            .await?;

        Ok(PostListing {
            category,
            page: paginator.page(number, items),
        })
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: i64) -> Result<Post> {
        self.posts()
            .get_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))
    }

    /// Get a post for display, with the viewer's ownership flag.
    pub async fn post_detail(&self, id: i64, identity: Option<&Identity>) -> Result<PostDetail> {
        let post = self.get_post(id).await?;
        let user_has_permission = is_owner(identity, post.owner_id);
        Ok(PostDetail {
            post,
            user_has_permission,
        })
    }

    async fn check_input(&self, input: &PostInput) -> Result<()> {
        validate_title(&input.title)?;
        validate_body(&input.body)?;
        if self.get_category(input.category_id).await?.is_none() {
            return Err(BlogError::Validation(
                "category: select a valid choice".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a post owned by the acting identity.
    pub async fn create_post(&self, identity: Option<&Identity>, input: PostInput) -> Result<Post> {
        let who = require_login(identity)?;
        self.check_input(&input).await?;

        let post = self.posts().create(who.user_id, &input).await?;
        info!(post_id = post.id, user_id = who.user_id, "Post created");
        Ok(post)
    }

    /// Load a post the identity is allowed to modify.
    ///
    /// Checks run in order: logged in, post exists, identity owns it.
    pub async fn owned_post(&self, id: i64, identity: Option<&Identity>) -> Result<Post> {
        require_login(identity)?;
        let post = self.get_post(id).await?;
        require_owner(identity, post.owner_id, "post")?;
        Ok(post)
    }

    /// Replace a post's title, body and category.
    pub async fn update_post(
        &self,
        id: i64,
        identity: Option<&Identity>,
        input: PostInput,
    ) -> Result<Post> {
        self.owned_post(id, identity).await?;
        self.check_input(&input).await?;

        let post = self
            .posts()
            .update(id, &PostUpdate::from(input))
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))?;
        info!(post_id = post.id, user_id = post.owner_id, "Post updated");
        Ok(post)
    }

    /// Delete a post.
    pub async fn delete_post(&self, id: i64, identity: Option<&Identity>) -> Result<()> {
        let post = self.owned_post(id, identity).await?;

        if !self.posts().delete(post.id).await? {
            return Err(BlogError::NotFound("post".to_string()));
        }
        info!(post_id = post.id, user_id = post.owner_id, "Post deleted");
        Ok(())
    }
}
