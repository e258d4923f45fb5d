//! Public content queries: everything the reader-facing pages consume.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::warn;

use crate::application::error::HttpError;
use crate::application::pagination::{PageRequest, total_pages};
use crate::application::repos::{
    CategoriesRepo, CategoryWithCount, PostListScope, PostQueryFilter, PostsRepo, PostsWriteRepo,
    RepoError, TagWithCount, TagsRepo, UsersRepo,
};
use crate::domain::entities::{PostDetail, PostSummaryRecord};
use crate::domain::types::PostStatus;

/// Rows per public listing page.
pub const PUBLIC_PAGE_SIZE: u32 = 9;

/// Sentinel category value meaning "no category filter".
pub const CATEGORY_ALL: &str = "all";

#[derive(Debug, Clone)]
pub enum FeedFilter {
    All,
    Category(String),
    Tag(String),
}

impl FeedFilter {
    fn query_filter(&self) -> PostQueryFilter {
        match self {
            FeedFilter::All => PostQueryFilter::default(),
            FeedFilter::Category(slug) => PostQueryFilter {
                category: Some(slug.clone()),
                ..PostQueryFilter::default()
            },
            FeedFilter::Tag(slug) => PostQueryFilter {
                tag: Some(slug.clone()),
                ..PostQueryFilter::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedPage {
    pub posts: Vec<PostSummaryRecord>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown category")]
    UnknownCategory,
    #[error("unknown tag")]
    UnknownTag,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<FeedError> for HttpError {
    fn from(error: FeedError) -> Self {
        match error {
            FeedError::UnknownCategory => HttpError::new(
                "application::feed",
                StatusCode::NOT_FOUND,
                "Unknown category",
                "category filter did not match any known category",
            ),
            FeedError::UnknownTag => HttpError::new(
                "application::feed",
                StatusCode::NOT_FOUND,
                "Unknown tag",
                "tag filter did not match any known tag",
            ),
            FeedError::Repo(err) => HttpError::from_error(
                "application::feed",
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                &err,
            ),
        }
    }
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    posts_write: Arc<dyn PostsWriteRepo>,
    categories: Arc<dyn CategoriesRepo>,
    tags: Arc<dyn TagsRepo>,
    users: Arc<dyn UsersRepo>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        posts_write: Arc<dyn PostsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
        tags: Arc<dyn TagsRepo>,
        users: Arc<dyn UsersRepo>,
    ) -> Self {
        Self {
            posts,
            posts_write,
            categories,
            tags,
            users,
        }
    }

    /// Latest published posts for the home page.
    pub async fn latest(&self, limit: u32) -> Result<Vec<PostSummaryRecord>, FeedError> {
        self.posts
            .list_posts(
                PostListScope::Public,
                &PostQueryFilter::default(),
                PageRequest::new(1, limit),
            )
            .await
            .map_err(FeedError::from)
    }

    /// One page of the public listing. Sub-queries run sequentially so a
    /// single request holds at most one pool connection at a time.
    pub async fn page(&self, filter: &FeedFilter, page: u32) -> Result<FeedPage, FeedError> {
        match filter {
            FeedFilter::Category(slug) => {
                if self.categories.find_by_slug(slug).await?.is_none() {
                    return Err(FeedError::UnknownCategory);
                }
            }
            FeedFilter::Tag(slug) => {
                if self.tags.find_by_slug(slug).await?.is_none() {
                    return Err(FeedError::UnknownTag);
                }
            }
            FeedFilter::All => {}
        }

        let query_filter = filter.query_filter();
        let total_items = self
            .posts
            .count_posts(PostListScope::Public, &query_filter)
            .await?;
        let request = PageRequest::new(page, PUBLIC_PAGE_SIZE).clamped_to(total_items);
        let posts = self
            .posts
            .list_posts(PostListScope::Public, &query_filter, request)
            .await?;

        Ok(FeedPage {
            posts,
            page: request.page(),
            total_pages: total_pages(total_items, PUBLIC_PAGE_SIZE),
        })
    }

    /// Resolve a published article with its category, tags, and author, and
    /// record the view. Drafts and archived posts are invisible here.
    pub async fn post_detail(&self, slug: &str) -> Result<Option<PostDetail>, FeedError> {
        let Some(post) = self.posts.find_by_slug(slug).await? else {
            return Ok(None);
        };
        if post.status != PostStatus::Published {
            return Ok(None);
        }

        let category = self
            .categories
            .find_by_id(post.category_id)
            .await?
            .ok_or_else(|| {
                RepoError::Integrity {
                    message: format!("post `{slug}` references a missing category"),
                }
            })?;
        let tags = self.posts.list_post_tags(post.id).await?;
        let author = self.users.find_by_id(post.author_id).await?.ok_or_else(|| {
            RepoError::Integrity {
                message: format!("post `{slug}` references a missing author"),
            }
        })?;

        // A failed counter bump should not take the page down with it.
        if let Err(err) = self.posts_write.increment_view_count(post.id).await {
            warn!(
                target = "bytebrief::feed",
                slug,
                error = %err,
                "failed to record article view"
            );
        }

        Ok(Some(PostDetail {
            post,
            category,
            tags,
            author,
        }))
    }

    pub async fn category(
        &self,
        slug: &str,
    ) -> Result<Option<crate::domain::entities::CategoryRecord>, FeedError> {
        self.categories
            .find_by_slug(slug)
            .await
            .map_err(FeedError::from)
    }

    pub async fn tag(
        &self,
        slug: &str,
    ) -> Result<Option<crate::domain::entities::TagRecord>, FeedError> {
        self.tags.find_by_slug(slug).await.map_err(FeedError::from)
    }

    pub async fn categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, FeedError> {
        self.categories
            .list_categories_with_counts()
            .await
            .map_err(FeedError::from)
    }

    pub async fn tags_with_counts(&self) -> Result<Vec<TagWithCount>, FeedError> {
        self.tags
            .list_tags_with_counts()
            .await
            .map_err(FeedError::from)
    }

    /// Published summaries matching both filters, for the read-only JSON
    /// endpoint. An absent or `all` category skips the category filter.
    pub async fn search(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<PostSummaryRecord>, FeedError> {
        let category = category
            .map(str::trim)
            .filter(|slug| !slug.is_empty() && *slug != CATEGORY_ALL);
        let search = search.map(str::trim).filter(|text| !text.is_empty());

        let filter = PostQueryFilter {
            category: category.map(str::to_string),
            tag: None,
            search: search.map(str::to_lowercase),
        };

        self.posts
            .list_posts(
                PostListScope::Public,
                &filter,
                PageRequest::new(1, PUBLIC_PAGE_SIZE * 4),
            )
            .await
            .map_err(FeedError::from)
    }
}
