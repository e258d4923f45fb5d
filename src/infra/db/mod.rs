//! Postgres-backed repository implementations.

mod categories;
mod posts;
mod tags;
mod users;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{PostListScope, PostQueryFilter, RepoError};
use crate::domain::types::PostStatus;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// Public listings only ever see Published rows with a publish timestamp.
    fn apply_scope_conditions(qb: &mut QueryBuilder<'_, Postgres>, scope: PostListScope) {
        match scope {
            PostListScope::Public => {
                qb.push(" AND p.status = ");
                qb.push_bind(PostStatus::Published);
                qb.push(" AND p.published_at IS NOT NULL ");
            }
            PostListScope::Admin => {}
        }
    }

    /// Category/tag filters narrow by slug; `search` is a case-insensitive
    /// substring match OR-ed across title, slug, excerpt, and content.
    fn apply_post_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q PostQueryFilter) {
        if let Some(category) = filter.category.as_ref() {
            qb.push(" AND c.slug = ");
            qb.push_bind(category);
        }

        if let Some(tag) = filter.tag.as_ref() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt INNER JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id = p.id AND t.slug = ",
            );
            qb.push_bind(tag);
            qb.push(")");
        }

        if let Some(search) = filter.search.as_ref() {
            let pattern = format!("%{search}%");
            qb.push(" AND (");
            qb.push("p.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.slug ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.excerpt ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.content ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }

    fn convert_count(value: i64) -> Result<u64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }
}
