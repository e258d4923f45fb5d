use std::sync::Arc;
use std::time::Duration;

use crate::application::repos::{CategoriesRepo, PostsRepo, PostsWriteRepo, TagsRepo};
use crate::domain::entities::PostSummaryRecord;
use crate::infra::cache::TtlCache;

/// Rows per admin listing page.
pub const ADMIN_PAGE_SIZE: u32 = 9;

/// How long a cached listing page or count stays live.
pub const LISTING_CACHE_TTL: Duration = Duration::from_secs(30);

/// Injected memoization for the admin post listing: one store for result
/// pages keyed by `filter|page`, one for totals keyed by filter alone.
pub struct ListingCache {
    pub(super) pages: TtlCache<Vec<PostSummaryRecord>>,
    pub(super) totals: TtlCache<u64>,
    pub(super) per_page: u32,
}

impl ListingCache {
    pub fn new(ttl: Duration, per_page: u32) -> Self {
        Self {
            pages: TtlCache::new("admin_post_pages", ttl),
            totals: TtlCache::new("admin_post_totals", ttl),
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(LISTING_CACHE_TTL, ADMIN_PAGE_SIZE)
    }
}

#[derive(Clone)]
pub struct AdminPostService {
    pub(super) reader: Arc<dyn PostsRepo>,
    pub(super) writer: Arc<dyn PostsWriteRepo>,
    pub(super) categories: Arc<dyn CategoriesRepo>,
    pub(super) tags: Arc<dyn TagsRepo>,
    pub(super) cache: Arc<ListingCache>,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
        tags: Arc<dyn TagsRepo>,
        cache: Arc<ListingCache>,
    ) -> Self {
        Self {
            reader,
            writer,
            categories,
            tags,
            cache,
        }
    }
}
