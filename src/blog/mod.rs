//! Blog module for Quill.
//!
//! Categories, posts, paginated listings and the [`BlogService`] that ties
//! them to the ownership guards.

mod category;
mod category_repository;
pub mod pagination;
mod post;
mod post_repository;
mod service;

pub use category::Category;
pub use category_repository::CategoryRepository;
pub use pagination::{Page, PageNumber, Paginator};
pub use post::{post_url, Post, PostInput, PostUpdate};
pub use post_repository::PostRepository;
pub use service::{
    parse_category_filter, validate_body, validate_title, BlogService, PostDetail, PostListing,
    MAX_BODY_LENGTH, MAX_TITLE_LENGTH,
};
