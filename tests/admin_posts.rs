//! Admin post listing behavior against in-memory repository stubs: cache
//! reuse inside the TTL window, refetch after expiry, overflow clamping, and
//! slug/publication rules on the write path.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use bytebrief::application::admin::posts::{
    AdminPostService, CreatePostCommand, ListingCache, UpdatePostCommand,
};
use bytebrief::application::pagination::PageRequest;
use bytebrief::application::repos::{
    CategoriesRepo, CategoryWithCount, CreateCategoryParams, CreatePostParams, PostListScope,
    PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError, TagWithCount, TagsRepo, UpdatePostParams,
    UpdatePostStatusParams,
};
use bytebrief::domain::entities::{CategoryRecord, PostRecord, PostSummaryRecord, TagRecord};
use bytebrief::domain::types::PostStatus;

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn fixture_category() -> CategoryRecord {
    CategoryRecord {
        id: Uuid::new_v4(),
        slug: "news".to_string(),
        name: "News".to_string(),
        description: None,
        color: None,
        icon: None,
        created_at: now(),
        updated_at: now(),
    }
}

struct StubCatalog {
    category: CategoryRecord,
    posts: Mutex<Vec<PostRecord>>,
    list_calls: AtomicUsize,
    count_calls: AtomicUsize,
    last_offset: Mutex<Option<u64>>,
}

impl StubCatalog {
    fn new(post_count: usize) -> Self {
        let category = fixture_category();
        let base = now();
        let posts = (0..post_count)
            .map(|index| PostRecord {
                id: Uuid::new_v4(),
                slug: format!("story-{index}"),
                title: format!("Story {index}"),
                excerpt: format!("Excerpt {index}"),
                content: format!("Body of story {index} with enough words to read."),
                status: PostStatus::Draft,
                read_time_minutes: 1,
                view_count: 0,
                category_id: category.id,
                author_id: Uuid::new_v4(),
                published_at: None,
                created_at: base - time::Duration::seconds(index as i64),
                updated_at: base,
            })
            .collect();

        Self {
            category,
            posts: Mutex::new(posts),
            list_calls: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
            last_offset: Mutex::new(None),
        }
    }

    fn matches(post: &PostRecord, filter: &PostQueryFilter) -> bool {
        match filter.search.as_ref() {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.slug.to_lowercase().contains(&needle)
                    || post.excerpt.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
        }
    }

    fn summary(&self, post: &PostRecord) -> PostSummaryRecord {
        PostSummaryRecord {
            id: post.id,
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            status: post.status,
            read_time_minutes: post.read_time_minutes,
            view_count: post.view_count,
            category_name: self.category.name.clone(),
            category_slug: self.category.slug.clone(),
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[async_trait]
impl PostsRepo for StubCatalog {
    async fn list_posts(
        &self,
        _scope: PostListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostSummaryRecord>, RepoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_offset.lock().unwrap() = Some(page.offset());

        let posts = self.posts.lock().unwrap();
        let mut matching: Vec<&PostRecord> = posts
            .iter()
            .filter(|post| Self::matches(post, filter))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page() as usize)
            .map(|post| self.summary(post))
            .collect())
    }

    async fn count_posts(
        &self,
        _scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().filter(|post| Self::matches(post, filter)).count() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|post| post.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .any(|post| post.slug == slug && Some(post.id) != exclude_id))
    }

    async fn list_post_tags(&self, _post_id: Uuid) -> Result<Vec<TagRecord>, RepoError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl PostsWriteRepo for StubCatalog {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let record = PostRecord {
            id: Uuid::new_v4(),
            slug: params.slug,
            title: params.title,
            excerpt: params.excerpt,
            content: params.content,
            status: params.status,
            read_time_minutes: params.read_time_minutes,
            view_count: 0,
            category_id: params.category_id,
            author_id: params.author_id,
            published_at: params.published_at,
            created_at: now(),
            updated_at: now(),
        };
        self.posts.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.slug = params.slug;
        post.title = params.title;
        post.excerpt = params.excerpt;
        post.content = params.content;
        post.read_time_minutes = params.read_time_minutes;
        post.category_id = params.category_id;
        post.updated_at = now();
        Ok(post.clone())
    }

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.status = params.status;
        if params.status == PostStatus::Published && post.published_at.is_none() {
            post.published_at = Some(now());
        }
        post.updated_at = now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn replace_post_tags(&self, _post_id: Uuid, _tag_ids: &[Uuid]) -> Result<(), RepoError> {
        Ok(())
    }

    async fn increment_view_count(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl CategoriesRepo for StubCatalog {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(vec![self.category.clone()])
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        Ok((self.category.slug == slug).then(|| self.category.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        Ok((self.category.id == id).then(|| self.category.clone()))
    }

    async fn slug_in_use(&self, slug: &str, _exclude: Option<Uuid>) -> Result<bool, RepoError> {
        Ok(self.category.slug == slug)
    }

    async fn count_published_posts(&self, _id: Uuid) -> Result<u64, RepoError> {
        Ok(0)
    }
}

#[async_trait]
impl TagsRepo for StubCatalog {
    async fn list_tags(&self) -> Result<Vec<TagRecord>, RepoError> {
        Ok(Vec::new())
    }

    async fn list_tags_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<TagRecord>, RepoError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<TagRecord>, RepoError> {
        Ok(None)
    }

    async fn slug_in_use(&self, _slug: &str, _exclude: Option<Uuid>) -> Result<bool, RepoError> {
        Ok(false)
    }

    async fn count_published_posts(&self, _id: Uuid) -> Result<u64, RepoError> {
        Ok(0)
    }
}

fn service_with(catalog: Arc<StubCatalog>, ttl: Duration) -> AdminPostService {
    AdminPostService::new(
        catalog.clone(),
        catalog.clone(),
        catalog.clone(),
        catalog,
        Arc::new(ListingCache::new(ttl, 9)),
    )
}

#[tokio::test]
async fn identical_requests_within_ttl_hit_the_repo_once() {
    let catalog = Arc::new(StubCatalog::new(12));
    let service = service_with(catalog.clone(), Duration::from_secs(30));

    let first = service.list(1, "").await.expect("first page");
    let second = service.list(1, "").await.expect("second page");

    assert_eq!(first.items.len(), 9);
    assert_eq!(second.items.len(), 9);
    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(catalog.count_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_entries_reach_the_repo_again() {
    let catalog = Arc::new(StubCatalog::new(12));
    let service = service_with(catalog.clone(), Duration::from_millis(20));

    service.list(1, "").await.expect("first page");
    tokio::time::sleep(Duration::from_millis(40)).await;
    service.list(1, "").await.expect("refetched page");

    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(catalog.count_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn different_pages_and_filters_are_cached_independently() {
    let catalog = Arc::new(StubCatalog::new(30));
    let service = service_with(catalog.clone(), Duration::from_secs(30));

    service.list(1, "").await.expect("page 1");
    service.list(2, "").await.expect("page 2");
    service.list(1, "story-3").await.expect("filtered page");

    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn equivalent_search_text_shares_one_cache_entry() {
    let catalog = Arc::new(StubCatalog::new(12));
    let service = service_with(catalog.clone(), Duration::from_secs(30));

    service.list(1, "Story").await.expect("search");
    service.list(1, "  story  ").await.expect("normalized search");

    assert_eq!(catalog.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overflowing_page_clamps_to_the_last_valid_page() {
    let catalog = Arc::new(StubCatalog::new(21));
    let service = service_with(catalog.clone(), Duration::from_secs(30));

    let listing = service.list(999, "").await.expect("clamped page");

    assert_eq!(listing.page, 3);
    assert_eq!(listing.total_pages, 3);
    assert_eq!(listing.items.len(), 3);
    assert_eq!(*catalog.last_offset.lock().unwrap(), Some(18));
}

#[tokio::test]
async fn create_post_disambiguates_colliding_slugs() {
    let catalog = Arc::new(StubCatalog::new(0));
    let service = service_with(catalog.clone(), Duration::from_secs(30));
    let category_id = catalog.category.id;

    let command = |title: &str| CreatePostCommand {
        title: title.to_string(),
        excerpt: "An excerpt".to_string(),
        content: "Some body text".to_string(),
        status: PostStatus::Draft,
        category_id,
        author_id: Uuid::new_v4(),
        tag_ids: Vec::new(),
    };

    let first = service
        .create_post("editor@bytebrief.dev", command("Launch Week"))
        .await
        .expect("first post");
    let second = service
        .create_post("editor@bytebrief.dev", command("Launch Week"))
        .await
        .expect("second post");
    let third = service
        .create_post("editor@bytebrief.dev", command("Launch Week"))
        .await
        .expect("third post");

    assert_eq!(first.slug, "launch-week");
    assert_eq!(second.slug, "launch-week-1");
    assert_eq!(third.slug, "launch-week-2");
}

#[tokio::test]
async fn editing_keeps_the_posts_own_slug_without_a_false_collision() {
    let catalog = Arc::new(StubCatalog::new(0));
    let service = service_with(catalog.clone(), Duration::from_secs(30));
    let category_id = catalog.category.id;

    let created = service
        .create_post(
            "editor@bytebrief.dev",
            CreatePostCommand {
                title: "Launch Week".to_string(),
                excerpt: "An excerpt".to_string(),
                content: "Some body text".to_string(),
                status: PostStatus::Draft,
                category_id,
                author_id: Uuid::new_v4(),
                tag_ids: Vec::new(),
            },
        )
        .await
        .expect("created");

    let updated = service
        .update_post(
            "editor@bytebrief.dev",
            UpdatePostCommand {
                id: created.id,
                slug: "launch-week".to_string(),
                title: "Launch Week, Revised".to_string(),
                excerpt: "An excerpt".to_string(),
                content: "Some body text, revised".to_string(),
                category_id,
                tag_ids: Vec::new(),
            },
        )
        .await
        .expect("updated");

    assert_eq!(updated.slug, "launch-week");
}

#[tokio::test]
async fn published_at_is_stamped_once_and_survives_later_transitions() {
    let catalog = Arc::new(StubCatalog::new(1));
    let service = service_with(catalog.clone(), Duration::from_secs(30));
    let id = catalog.posts.lock().unwrap()[0].id;

    let published = service
        .update_status("editor@bytebrief.dev", id, PostStatus::Published)
        .await
        .expect("published");
    let first_stamp = published.published_at.expect("publish stamp");

    let archived = service
        .update_status("editor@bytebrief.dev", id, PostStatus::Archived)
        .await
        .expect("archived");
    assert_eq!(archived.published_at, Some(first_stamp));

    let republished = service
        .update_status("editor@bytebrief.dev", id, PostStatus::Published)
        .await
        .expect("republished");
    assert_eq!(republished.published_at, Some(first_stamp));
}
