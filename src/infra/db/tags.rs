use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateTagParams, RepoError, TagWithCount, TagsRepo, TagsWriteRepo, UpdateTagParams,
};
use crate::domain::entities::TagRecord;

use super::PostgresRepositories;
use super::map_sqlx_error;

const TAG_COLUMNS: &str = "id, slug, name, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(super) struct TagRow {
    pub(super) id: Uuid,
    pub(super) slug: String,
    pub(super) name: String,
    pub(super) created_at: OffsetDateTime,
    pub(super) updated_at: OffsetDateTime,
}

impl From<TagRow> for TagRecord {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagCountRow {
    id: Uuid,
    slug: String,
    name: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    published_posts: i64,
}

#[async_trait]
impl TagsRepo for PostgresRepositories {
    async fn list_tags(&self) -> Result<Vec<TagRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags ORDER BY LOWER(name)"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TagRecord::from).collect())
    }

    async fn list_tags_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let rows = sqlx::query_as::<_, TagCountRow>(
            "SELECT t.id, t.slug, t.name, t.created_at, t.updated_at, \
             COUNT(p.id) FILTER (WHERE p.status = 'published'::post_status) AS published_posts \
             FROM tags t \
             LEFT JOIN post_tags pt ON pt.tag_id = t.id \
             LEFT JOIN posts p ON p.id = pt.post_id \
             GROUP BY t.id, t.slug, t.name, t.created_at, t.updated_at \
             ORDER BY LOWER(t.name)",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut tags = Vec::with_capacity(rows.len());
        for row in rows {
            let published_posts = Self::convert_count(row.published_posts)?;
            tags.push(TagWithCount {
                tag: TagRecord {
                    id: row.id,
                    slug: row.slug,
                    name: row.name,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                published_posts,
            });
        }

        Ok(tags)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<TagRecord>, RepoError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TagRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TagRecord>, RepoError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TagRecord::from))
    }

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM tags WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_published_posts(&self, id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts p \
             INNER JOIN post_tags pt ON pt.post_id = p.id \
             WHERE pt.tag_id = $1 AND p.status = 'published'::post_status",
        )
        .bind(id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}

#[async_trait]
impl TagsWriteRepo for PostgresRepositories {
    async fn create_tag(&self, params: CreateTagParams) -> Result<TagRecord, RepoError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "INSERT INTO tags (slug, name) VALUES ($1, $2) RETURNING {TAG_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(TagRecord::from(row))
    }

    async fn update_tag(&self, params: UpdateTagParams) -> Result<TagRecord, RepoError> {
        let row = sqlx::query_as::<_, TagRow>(&format!(
            "UPDATE tags SET slug = $2, name = $3, updated_at = now() \
             WHERE id = $1 RETURNING {TAG_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.slug)
        .bind(&params.name)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(TagRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_tag(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
