// Core modules
mod auth;
mod bookmarks;
mod db;
mod error;
mod types;

pub mod api;

// Re-export key types and functions
pub use api::{AppState, create_router};
pub use auth::{Authenticator, UserStore};
pub use bookmarks::{BookmarkService, BookmarkStore, BookmarkWithTags, TagIndex};
pub use db::{DatabaseConfig, Db, create_connection, ensure_schema};
pub use error::ApiError;
pub use types::{BearerToken, BookmarkId, UserId};
