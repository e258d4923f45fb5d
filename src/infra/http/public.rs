use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, Query, State},
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        error::HttpError,
        feed::{FeedError, FeedFilter, FeedService},
        pagination::pagination_window,
    },
    infra::{db::PostgresRepositories, uploads::UploadStorage},
    presentation::views::{
        BlogTemplate, CategoryBadge, IndexTemplate, PostCard, PostTemplate, TagBadge,
        build_window_slots, render_not_found_response, render_template_response,
    },
};

use super::{
    api, db_health_response,
    middleware::{log_responses, set_request_context},
};

const HOME_POST_COUNT: u32 = 6;

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub db: Arc<PostgresRepositories>,
    pub upload_storage: Arc<UploadStorage>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_index))
        .route("/categories/{slug}", get(category_index))
        .route("/tags/{slug}", get(tag_index))
        .route("/posts/{slug}", get(post_detail))
        .route("/api/posts", get(api::list_posts))
        .route("/uploads/{*path}", get(serve_upload))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<u32>,
}

async fn index(State(state): State<HttpState>) -> Response {
    // One connection at a time: the two reads run back to back on purpose.
    let latest = match state.feed.latest(HOME_POST_COUNT).await {
        Ok(posts) => posts,
        Err(err) => return HttpError::from(err).into_response(),
    };
    let categories = match state.feed.categories_with_counts().await {
        Ok(categories) => categories,
        Err(err) => return HttpError::from(err).into_response(),
    };

    render_template_response(
        IndexTemplate {
            latest: latest.iter().map(PostCard::from_summary).collect(),
            categories: categories.iter().map(CategoryBadge::from_count).collect(),
        },
        StatusCode::OK,
    )
}

async fn blog_index(State(state): State<HttpState>, Query(query): Query<PageQuery>) -> Response {
    let page = query.page.unwrap_or(1);
    render_listing(
        &state,
        FeedFilter::All,
        page,
        "All stories".to_string(),
        None,
        "/blog".to_string(),
    )
    .await
}

async fn category_index(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let category = match state.feed.category(&slug).await {
        Ok(Some(category)) => category,
        Ok(None) => return render_not_found_response(),
        Err(err) => return HttpError::from(err).into_response(),
    };

    render_listing(
        &state,
        FeedFilter::Category(slug.clone()),
        query.page.unwrap_or(1),
        category.name,
        category.description,
        format!("/categories/{slug}"),
    )
    .await
}

async fn tag_index(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let tag = match state.feed.tag(&slug).await {
        Ok(Some(tag)) => tag,
        Ok(None) => return render_not_found_response(),
        Err(err) => return HttpError::from(err).into_response(),
    };

    render_listing(
        &state,
        FeedFilter::Tag(slug.clone()),
        query.page.unwrap_or(1),
        format!("#{}", tag.name),
        None,
        format!("/tags/{slug}"),
    )
    .await
}

async fn render_listing(
    state: &HttpState,
    filter: FeedFilter,
    page: u32,
    heading: String,
    description: Option<String>,
    base_path: String,
) -> Response {
    let feed_page = match state.feed.page(&filter, page).await {
        Ok(feed_page) => feed_page,
        Err(FeedError::UnknownCategory | FeedError::UnknownTag) => {
            return render_not_found_response();
        }
        Err(err) => return HttpError::from(err).into_response(),
    };

    let tags = match state.feed.tags_with_counts().await {
        Ok(tags) => tags,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let window = pagination_window(feed_page.page, feed_page.total_pages);
    let slots = build_window_slots(&window, feed_page.page, |number| {
        format!("{base_path}?page={number}")
    });

    render_template_response(
        BlogTemplate {
            heading,
            description,
            posts: feed_page.posts.iter().map(PostCard::from_summary).collect(),
            window: slots,
            tags: tags.iter().map(TagBadge::from_count).collect(),
        },
        StatusCode::OK,
    )
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    match state.feed.post_detail(&slug).await {
        Ok(Some(detail)) => {
            render_template_response(PostTemplate::from_detail(&detail), StatusCode::OK)
        }
        Ok(None) => render_not_found_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn serve_upload(State(state): State<HttpState>, Path(path): Path<String>) -> Response {
    match state.upload_storage.read(&path).await {
        Ok(data) => {
            let content_type = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, content_type)
                .header(CACHE_CONTROL, "public, max-age=86400")
                .body(Body::from(data))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback() -> Response {
    render_not_found_response()
}
