use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, SessionRecord, UsersRepo};
use crate::domain::entities::UserRecord;
use crate::domain::types::UserRole;

use super::PostgresRepositories;
use super::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    avatar_url: Option<String>,
    role: UserRole,
    created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            avatar_url: row.avatar_url,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    email: String,
    name: String,
    avatar_url: Option<String>,
    role: UserRole,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, avatar_url, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT u.id, u.email, u.name, u.avatar_url, u.role, u.created_at, s.expires_at \
             FROM sessions s INNER JOIN users u ON u.id = s.user_id \
             WHERE s.token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|row| SessionRecord {
            user: UserRecord {
                id: row.id,
                email: row.email,
                name: row.name,
                avatar_url: row.avatar_url,
                role: row.role,
                created_at: row.created_at,
            },
            expires_at: row.expires_at,
        }))
    }
}
