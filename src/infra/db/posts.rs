use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{
    CreatePostParams, PostListScope, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams, UpdatePostStatusParams,
};
use crate::domain::entities::{PostRecord, PostSummaryRecord, TagRecord};
use crate::domain::types::PostStatus;

use super::PostgresRepositories;
use super::map_sqlx_error;
use super::tags::TagRow;

const POST_COLUMNS: &str = "id, slug, title, excerpt, content, status, read_time_minutes, \
     view_count, category_id, author_id, published_at, created_at, updated_at";

const SUMMARY_SELECT: &str = "SELECT p.id, p.slug, p.title, p.excerpt, p.status, \
     p.read_time_minutes, p.view_count, c.name AS category_name, c.slug AS category_slug, \
     p.published_at, p.created_at, p.updated_at \
     FROM posts p INNER JOIN categories c ON c.id = p.category_id WHERE 1=1 ";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: String,
    content: String,
    status: PostStatus,
    read_time_minutes: i32,
    view_count: i64,
    category_id: Uuid,
    author_id: Uuid,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            status: row.status,
            read_time_minutes: row.read_time_minutes,
            view_count: row.view_count,
            category_id: row.category_id,
            author_id: row.author_id,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostSummaryRow {
    id: Uuid,
    slug: String,
    title: String,
    excerpt: String,
    status: PostStatus,
    read_time_minutes: i32,
    view_count: i64,
    category_name: String,
    category_slug: String,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PostSummaryRow> for PostSummaryRecord {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt,
            status: row.status,
            read_time_minutes: row.read_time_minutes,
            view_count: row.view_count,
            category_name: row.category_name,
            category_slug: row.category_slug,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostSummaryRecord>, RepoError> {
        let mut qb = QueryBuilder::new(SUMMARY_SELECT);
        Self::apply_scope_conditions(&mut qb, scope);
        Self::apply_post_filter(&mut qb, filter);

        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(i64::from(page.per_page()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset() as i64);

        let rows = qb
            .build_query_as::<PostSummaryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostSummaryRecord::from).collect())
    }

    async fn count_posts(
        &self,
        scope: PostListScope,
        filter: &PostQueryFilter,
    ) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM posts p INNER JOIN categories c ON c.id = p.category_id WHERE 1=1 ",
        );
        Self::apply_scope_conditions(&mut qb, scope);
        Self::apply_post_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_post_tags(&self, post_id: Uuid) -> Result<Vec<TagRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT t.id, t.slug, t.name, t.created_at, t.updated_at \
             FROM tags t INNER JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE pt.post_id = $1 ORDER BY LOWER(t.name)",
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TagRecord::from).collect())
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (slug, title, excerpt, content, status, read_time_minutes, \
             category_id, author_id, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
             CASE WHEN $5 = 'published'::post_status THEN COALESCE($9, now()) ELSE $9 END) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.excerpt)
        .bind(&params.content)
        .bind(params.status)
        .bind(params.read_time_minutes)
        .bind(params.category_id)
        .bind(params.author_id)
        .bind(params.published_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET slug = $2, title = $3, excerpt = $4, content = $5, \
             read_time_minutes = $6, category_id = $7, updated_at = now() \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.excerpt)
        .bind(&params.content)
        .bind(params.read_time_minutes)
        .bind(params.category_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError> {
        // The first transition into Published stamps `published_at`; later
        // transitions never clear it.
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET status = $2, \
             published_at = CASE WHEN $2 = 'published'::post_status \
             THEN COALESCE(published_at, now()) ELSE published_at END, \
             updated_at = now() \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(params.id)
        .bind(params.status)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn replace_post_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
