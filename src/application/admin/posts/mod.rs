mod commands;
mod queries;
mod service;
mod types;

pub use queries::PostListPage;
pub use service::{AdminPostService, ListingCache};
pub use types::{AdminPostError, CreatePostCommand, UpdatePostCommand};
