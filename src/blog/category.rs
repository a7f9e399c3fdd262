//! Category model for Quill.

/// Category used to partition posts for filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: i64,
    /// Display name (unique).
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}
