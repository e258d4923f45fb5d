//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{PostStatus, UserRole};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub status: PostStatus,
    pub read_time_minutes: i32,
    pub view_count: i64,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Reduced projection of a post used by list views; carries the joined
/// category identity but not the full content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummaryRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub read_time_minutes: i32,
    pub view_count: i64,
    pub category_name: String,
    pub category_slug: String,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRecord {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
}

/// A fully-resolved article for the public detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: PostRecord,
    pub category: CategoryRecord,
    pub tags: Vec<TagRecord>,
    pub author: UserRecord,
}
