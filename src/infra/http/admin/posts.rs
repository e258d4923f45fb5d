use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::application::admin::posts::{
    AdminPostError, CreatePostCommand, PostListPage, UpdatePostCommand,
};
use crate::application::auth::AuthenticatedUser;
use crate::application::error::HttpError;
use crate::application::pagination::pagination_window;
use crate::domain::entities::{CategoryRecord, PostRecord, TagRecord};
use crate::domain::types::PostStatus;
use crate::infra::http::repo_error_to_http;
use crate::presentation::admin::views::{
    AdminPostFormTemplate, AdminPostRow, AdminPostsTemplate, SelectOption, TagCheckbox,
};
use crate::presentation::views::{build_window_slots, render_template_response};

use super::AdminState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    page: Option<u32>,
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    title: String,
    #[serde(default)]
    slug: String,
    excerpt: String,
    content: String,
    category_id: Uuid,
    #[serde(default, rename = "tag")]
    tags: Vec<Uuid>,
}

pub async fn admin_posts(
    State(state): State<AdminState>,
    Query(params): Query<ListQuery>,
) -> Response {
    let page = params.page.unwrap_or(1);
    let query = params.query.unwrap_or_default();

    let listing = match state.posts.list(page, &query).await {
        Ok(listing) => listing,
        Err(err) => return post_error_to_http(err).into_response(),
    };

    render_template_response(build_listing_template(listing, &query), StatusCode::OK)
}

fn build_listing_template(listing: PostListPage, query: &str) -> AdminPostsTemplate {
    let window = pagination_window(listing.page, listing.total_pages);
    let encoded_query: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    let slots = build_window_slots(&window, listing.page, |number| {
        if encoded_query.is_empty() {
            format!("/posts?page={number}")
        } else {
            format!("/posts?page={number}&query={encoded_query}")
        }
    });

    AdminPostsTemplate {
        rows: listing.items.iter().map(AdminPostRow::from_summary).collect(),
        query: query.to_string(),
        page: listing.page,
        total_pages: listing.total_pages,
        total_items: listing.total_items,
        window: slots,
    }
}

pub async fn admin_post_new(State(state): State<AdminState>) -> Response {
    let (categories, tags) = match load_editor_choices(&state).await {
        Ok(choices) => choices,
        Err(err) => return err.into_response(),
    };

    render_template_response(
        AdminPostFormTemplate::for_new(
            category_options(&categories, None),
            tag_checkboxes(&tags, &[]),
        ),
        StatusCode::OK,
    )
}

pub async fn admin_post_create(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Form(form): Form<PostForm>,
) -> Response {
    let command = CreatePostCommand {
        title: form.title,
        excerpt: form.excerpt,
        content: form.content,
        status: PostStatus::Draft,
        category_id: form.category_id,
        author_id: user.id,
        tag_ids: form.tags,
    };

    match state.posts.create_post(&user.email, command).await {
        Ok(_) => Redirect::to("/posts").into_response(),
        Err(err) => post_error_to_http(err).into_response(),
    }
}

pub async fn admin_post_edit(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    let post = match load_post(&state, id).await {
        Ok(post) => post,
        Err(response) => return response,
    };

    let (categories, tags) = match load_editor_choices(&state).await {
        Ok(choices) => choices,
        Err(err) => return err.into_response(),
    };

    let selected_tags = match state.posts.load_post_tags(id).await {
        Ok(tags) => tags.into_iter().map(|tag| tag.id).collect::<Vec<_>>(),
        Err(err) => return post_error_to_http(err).into_response(),
    };

    render_template_response(
        AdminPostFormTemplate::for_edit(
            &post,
            category_options(&categories, Some(post.category_id)),
            tag_checkboxes(&tags, &selected_tags),
        ),
        StatusCode::OK,
    )
}

pub async fn admin_post_update(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<PostForm>,
) -> Response {
    let command = UpdatePostCommand {
        id,
        slug: form.slug,
        title: form.title,
        excerpt: form.excerpt,
        content: form.content,
        category_id: form.category_id,
        tag_ids: form.tags,
    };

    match state.posts.update_post(&user.email, command).await {
        Ok(_) => Redirect::to("/posts").into_response(),
        Err(err) => post_error_to_http(err).into_response(),
    }
}

pub async fn admin_post_publish(
    state: State<AdminState>,
    user: Extension<AuthenticatedUser>,
    id: Path<Uuid>,
) -> Response {
    change_status(state, user, id, PostStatus::Published).await
}

pub async fn admin_post_move_to_draft(
    state: State<AdminState>,
    user: Extension<AuthenticatedUser>,
    id: Path<Uuid>,
) -> Response {
    change_status(state, user, id, PostStatus::Draft).await
}

pub async fn admin_post_archive(
    state: State<AdminState>,
    user: Extension<AuthenticatedUser>,
    id: Path<Uuid>,
) -> Response {
    change_status(state, user, id, PostStatus::Archived).await
}

async fn change_status(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    status: PostStatus,
) -> Response {
    match state.posts.update_status(&user.email, id, status).await {
        Ok(_) => Redirect::to("/posts").into_response(),
        Err(err) => post_error_to_http(err).into_response(),
    }
}

pub async fn admin_post_delete(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.posts.delete_post(&user.email, id).await {
        Ok(()) => Redirect::to("/posts").into_response(),
        Err(err) => post_error_to_http(err).into_response(),
    }
}

async fn load_post(state: &AdminState, id: Uuid) -> Result<PostRecord, Response> {
    match state.posts.load_post(id).await {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(HttpError::new(
            "infra::http::admin::posts",
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("no post with id {id}"),
        )
        .into_response()),
        Err(err) => Err(post_error_to_http(err).into_response()),
    }
}

async fn load_editor_choices(
    state: &AdminState,
) -> Result<(Vec<CategoryRecord>, Vec<TagRecord>), HttpError> {
    let categories = state
        .posts
        .available_categories()
        .await
        .map_err(post_error_to_http)?;
    let tags = state
        .posts
        .available_tags()
        .await
        .map_err(post_error_to_http)?;
    Ok((categories, tags))
}

fn category_options(categories: &[CategoryRecord], selected: Option<Uuid>) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|category| SelectOption {
            value: category.id.to_string(),
            label: category.name.clone(),
            selected: selected.is_some_and(|id| id == category.id),
        })
        .collect()
}

fn tag_checkboxes(tags: &[TagRecord], selected: &[Uuid]) -> Vec<TagCheckbox> {
    tags.iter()
        .map(|tag| TagCheckbox {
            value: tag.id.to_string(),
            label: tag.name.clone(),
            checked: selected.contains(&tag.id),
        })
        .collect()
}

fn post_error_to_http(err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::MissingField(field) => HttpError::new(
            "infra::http::admin::posts",
            StatusCode::BAD_REQUEST,
            "Missing required field",
            format!("field `{field}` is required"),
        ),
        AdminPostError::DuplicateSlug(slug) => HttpError::new(
            "infra::http::admin::posts",
            StatusCode::CONFLICT,
            "Slug already in use",
            slug,
        ),
        AdminPostError::UnknownCategory(id) => HttpError::new(
            "infra::http::admin::posts",
            StatusCode::BAD_REQUEST,
            "Unknown category",
            format!("category {id} does not exist"),
        ),
        AdminPostError::Repo(repo) => repo_error_to_http("infra::http::admin::posts", repo),
    }
}
