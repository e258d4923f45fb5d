use crate::application::pagination::{PageRequest, total_pages};
use crate::application::repos::{PostListScope, PostQueryFilter, RepoError};
use crate::domain::entities::{PostRecord, PostSummaryRecord};
use uuid::Uuid;

use super::service::AdminPostService;
use super::types::AdminPostError;

/// One rendered page of the admin post listing.
#[derive(Debug, Clone)]
pub struct PostListPage {
    pub items: Vec<PostSummaryRecord>,
    /// Effective page after overflow clamping.
    pub page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl AdminPostService {
    /// Serve one page of the searchable post listing.
    ///
    /// Identical requests within the cache TTL are answered from memory and
    /// never reach the persistence layer; a page beyond the last valid one
    /// is clamped down before querying. Persistence errors on a miss
    /// propagate unchanged.
    pub async fn list(&self, page: u32, query: &str) -> Result<PostListPage, AdminPostError> {
        let filter_key = normalize_filter(query);

        let total_items = self.total(&filter_key).await?;
        let total_pages = total_pages(total_items, self.cache.per_page);

        let request = PageRequest::new(page, self.cache.per_page).clamped_to(total_items);
        let cache_key = format!("{filter_key}|{}", request.page());

        if let Some(items) = self.cache.pages.get(&cache_key) {
            return Ok(PostListPage {
                items,
                page: request.page(),
                total_items,
                total_pages,
            });
        }

        let filter = filter_for(&filter_key);
        let items = self
            .reader
            .list_posts(PostListScope::Admin, &filter, request)
            .await?;
        self.cache.pages.insert(cache_key, items.clone());

        Ok(PostListPage {
            items,
            page: request.page(),
            total_items,
            total_pages,
        })
    }

    /// Total matching posts for a filter, cached under the filter key alone.
    pub async fn total(&self, query: &str) -> Result<u64, AdminPostError> {
        let filter_key = normalize_filter(query);

        if let Some(total) = self.cache.totals.get(&filter_key) {
            return Ok(total);
        }

        let filter = filter_for(&filter_key);
        let total = self
            .reader
            .count_posts(PostListScope::Admin, &filter)
            .await?;
        self.cache.totals.insert(filter_key, total);

        Ok(total)
    }

    pub async fn load_post(&self, id: Uuid) -> Result<Option<PostRecord>, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn load_post_tags(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<crate::domain::entities::TagRecord>, AdminPostError> {
        self.reader
            .list_post_tags(post_id)
            .await
            .map_err(AdminPostError::from)
    }

    pub(super) async fn slug_free(
        &self,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        self.reader
            .slug_in_use(slug, exclude_id)
            .await
            .map(|in_use| !in_use)
    }
}

/// Cache keys use the sentinel `all` for an absent filter; search text is
/// trimmed and lowercased so equivalent queries share an entry.
fn normalize_filter(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        "all".to_string()
    } else {
        trimmed.to_lowercase()
    }
}

fn filter_for(filter_key: &str) -> PostQueryFilter {
    PostQueryFilter {
        search: (filter_key != "all").then(|| filter_key.to_string()),
        ..PostQueryFilter::default()
    }
}
