//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{
    CategoryRecord, PostRecord, PostSummaryRecord, TagRecord, UserRecord,
};
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Visibility scope of a post listing. Public listings only ever see
/// Published rows; the admin console sees every status.
#[derive(Debug, Clone, Copy)]
pub enum PostListScope {
    Public,
    Admin,
}

/// Filter applied to post listings. `search` is a case-insensitive substring
/// match OR-ed across title, slug, excerpt, and content.
#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithCount {
    pub category: CategoryRecord,
    pub published_posts: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagWithCount {
    pub tag: TagRecord,
    pub published_posts: u64,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub read_time_minutes: i32,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub read_time_minutes: i32,
    pub category_id: Uuid,
}

/// Status transitions leave `published_at` management to the adapter: the
/// first transition into Published stamps it, later transitions never clear
/// it.
#[derive(Debug, Clone, Copy)]
pub struct UpdatePostStatusParams {
    pub id: Uuid,
    pub status: PostStatus,
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTagParams {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateTagParams {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// A session row joined to its user, as left behind by the external sign-in
/// flow.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user: UserRecord,
    pub expires_at: OffsetDateTime,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// List summaries ordered by creation time descending at the request's
    /// offset, returning at most `page.per_page` rows.
    async fn list_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostSummaryRecord>, RepoError>;

    async fn count_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// Whether `slug` is taken by a post other than `exclude_id`.
    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError>;

    async fn list_post_tags(&self, post_id: Uuid) -> Result<Vec<TagRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;

    async fn replace_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;

    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    /// Categories with their Published-post counts, for the public reader.
    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError>;

    async fn count_published_posts(&self, id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<TagRecord>, RepoError>;

    async fn list_tags_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<TagRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TagRecord>, RepoError>;

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError>;

    async fn count_published_posts(&self, id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait TagsWriteRepo: Send + Sync {
    async fn create_tag(&self, params: CreateTagParams) -> Result<TagRecord, RepoError>;

    async fn update_tag(&self, params: UpdateTagParams) -> Result<TagRecord, RepoError>;

    async fn delete_tag(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    /// Look up a live session by the SHA-256 hash of its token.
    async fn find_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepoError>;
}
