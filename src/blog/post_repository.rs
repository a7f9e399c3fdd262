//! Post repository for Quill.
//!
//! This module provides CRUD operations for posts in the database.

use sqlx::QueryBuilder;

use super::post::{Post, PostInput, PostUpdate};
use crate::db::DbPool;
use crate::{BlogError, Result};

/// Select list shared by every post query, joined with owner and category.
const POST_SELECT: &str = "SELECT p.id, p.title, p.body, p.owner_id, u.username AS owner_username,
        p.category_id, c.name AS category_name, p.created_at, p.updated_at
     FROM posts p
     JOIN users u ON u.id = p.owner_id
     JOIN categories c ON c.id = p.category_id";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post owned by `owner_id`.
    pub async fn create(&self, owner_id: i64, input: &PostInput) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (title, body, owner_id, category_id)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(owner_id)
        .bind(input.category_id)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!("{POST_SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(post)
    }

    /// Update a post by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated post, or None if not found.
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<Option<Post>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref body) = update.body {
            separated.push("body = ");
            separated.push_bind_unseparated(body);
        }
        if let Some(category_id) = update.category_id {
            separated.push("category_id = ");
            separated.push_bind_unseparated(category_id);
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a post by ID.
    ///
    /// Returns true if a post was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts whose category equals `category_id`, oldest first.
    ///
    /// `None` is bound as SQL NULL, and `category_id = NULL` never matches,
    /// so an absent filter yields no rows.
    pub async fn list_by_category(
        &self,
        category_id: Option<i64>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "{POST_SELECT} WHERE p.category_id = ? ORDER BY p.id LIMIT ? OFFSET ?"
        ))
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }

    /// Count posts matching the same filter as [`list_by_category`](Self::list_by_category).
    pub async fn count_by_category(&self, category_id: Option<i64>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
