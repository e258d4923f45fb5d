use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::admin::tags::AdminTagError;
use crate::application::auth::AuthenticatedUser;
use crate::application::error::HttpError;
use crate::infra::http::repo_error_to_http;
use crate::presentation::admin::views::{AdminTagRow, AdminTagsTemplate};
use crate::presentation::views::render_template_response;

use super::AdminState;

#[derive(Debug, Deserialize)]
pub struct TagForm {
    name: String,
}

pub async fn admin_tags(State(state): State<AdminState>) -> Response {
    match state.tags.list().await {
        Ok(tags) => render_template_response(
            AdminTagsTemplate {
                rows: tags.iter().map(AdminTagRow::from_record).collect(),
            },
            StatusCode::OK,
        ),
        Err(err) => tag_error_to_http(err).into_response(),
    }
}

pub async fn admin_tag_create(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Form(form): Form<TagForm>,
) -> Response {
    match state.tags.create(&user.email, &form.name).await {
        Ok(_) => Redirect::to("/tags").into_response(),
        Err(err) => tag_error_to_http(err).into_response(),
    }
}

pub async fn admin_tag_rename(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<TagForm>,
) -> Response {
    match state.tags.rename(&user.email, id, &form.name).await {
        Ok(_) => Redirect::to("/tags").into_response(),
        Err(err) => tag_error_to_http(err).into_response(),
    }
}

pub async fn admin_tag_delete(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.tags.delete(&user.email, id).await {
        Ok(()) => Redirect::to("/tags").into_response(),
        Err(err) => tag_error_to_http(err).into_response(),
    }
}

fn tag_error_to_http(err: AdminTagError) -> HttpError {
    match err {
        AdminTagError::MissingField(field) => HttpError::new(
            "infra::http::admin::tags",
            StatusCode::BAD_REQUEST,
            "Missing required field",
            format!("field `{field}` is required"),
        ),
        AdminTagError::DuplicateSlug(slug) => HttpError::new(
            "infra::http::admin::tags",
            StatusCode::CONFLICT,
            "Slug already in use",
            slug,
        ),
        AdminTagError::InUse { published_posts } => HttpError::new(
            "infra::http::admin::tags",
            StatusCode::CONFLICT,
            "Tag still has published posts",
            format!("{published_posts} published posts carry this tag"),
        ),
        AdminTagError::NotFound => HttpError::new(
            "infra::http::admin::tags",
            StatusCode::NOT_FOUND,
            "Tag not found",
            "tag not found",
        ),
        AdminTagError::Repo(repo) => repo_error_to_http("infra::http::admin::tags", repo),
    }
}
