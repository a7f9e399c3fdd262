//! Web module for Quill.
//!
//! Serves the blog pages over HTTP. Each page answers with a JSON
//! document naming its template and carrying the template context.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use middleware::JwtState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
