use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("required field `{0}` is missing or empty")]
    MissingField(&'static str),
    #[error("slug `{0}` is already in use")]
    DuplicateSlug(String),
    #[error("category `{0}` does not exist")]
    UnknownCategory(Uuid),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub tag_ids: Vec<Uuid>,
}

/// Content edit; an empty `slug` re-derives one from the title, a non-empty
/// slug is checked for collisions excluding the post's own row.
#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
}

pub(super) fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminPostError> {
    if value.trim().is_empty() {
        return Err(AdminPostError::MissingField(field));
    }
    Ok(())
}
