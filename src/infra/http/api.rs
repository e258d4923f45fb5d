//! Read-only JSON surface for published content.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::error::HttpError;
use crate::domain::entities::PostSummaryRecord;

use super::public::HttpState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostsQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiPostSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: ApiCategoryRef,
    pub read_time_minutes: i32,
    pub view_count: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct ApiCategoryRef {
    pub name: String,
    pub slug: String,
}

impl From<&PostSummaryRecord> for ApiPostSummary {
    fn from(summary: &PostSummaryRecord) -> Self {
        Self {
            id: summary.id,
            slug: summary.slug.clone(),
            title: summary.title.clone(),
            excerpt: summary.excerpt.clone(),
            category: ApiCategoryRef {
                name: summary.category_name.clone(),
                slug: summary.category_slug.clone(),
            },
            read_time_minutes: summary.read_time_minutes,
            view_count: summary.view_count,
            published_at: summary.published_at,
        }
    }
}

/// `GET /api/posts?category=<slug>&search=<text>` — published summaries
/// matching both filters; `category=all` (or absent) skips that filter.
pub async fn list_posts(
    State(state): State<HttpState>,
    Query(query): Query<PostsQuery>,
) -> Response {
    match state
        .feed
        .search(query.category.as_deref(), query.search.as_deref())
        .await
    {
        Ok(posts) => {
            let body: Vec<ApiPostSummary> = posts.iter().map(ApiPostSummary::from).collect();
            Json(body).into_response()
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}
