use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CategoryWithCount, CreateCategoryParams, RepoError,
    UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;

use super::PostgresRepositories;
use super::map_sqlx_error;

const CATEGORY_COLUMNS: &str = "id, slug, name, description, color, icon, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    slug: String,
    name: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            color: row.color,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    id: Uuid,
    slug: String,
    name: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    published_posts: i64,
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY LOWER(name)"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }

    async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            "SELECT c.id, c.slug, c.name, c.description, c.color, c.icon, \
             c.created_at, c.updated_at, \
             COUNT(p.id) FILTER (WHERE p.status = 'published'::post_status) AS published_posts \
             FROM categories c \
             LEFT JOIN posts p ON p.category_id = c.id \
             GROUP BY c.id, c.slug, c.name, c.description, c.color, c.icon, \
             c.created_at, c.updated_at \
             ORDER BY LOWER(c.name)",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            let published_posts = Self::convert_count(row.published_posts)?;
            categories.push(CategoryWithCount {
                category: CategoryRecord {
                    id: row.id,
                    slug: row.slug,
                    name: row.name,
                    description: row.description,
                    color: row.color,
                    icon: row.icon,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
                published_posts,
            });
        }

        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CategoryRecord::from))
    }

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_published_posts(&self, id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts \
             WHERE category_id = $1 AND status = 'published'::post_status",
        )
        .bind(id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}

#[async_trait]
impl CategoriesWriteRepo for PostgresRepositories {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO categories (slug, name, description, color, icon) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.color)
        .bind(&params.icon)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CategoryRecord::from(row))
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE categories SET slug = $2, name = $3, description = $4, color = $5, \
             icon = $6, updated_at = now() WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.slug)
        .bind(&params.name)
        .bind(&params.description)
        .bind(&params.color)
        .bind(&params.icon)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(CategoryRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
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
