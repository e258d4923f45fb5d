use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::admin::categories::{
    AdminCategoryError, CreateCategoryCommand, UpdateCategoryCommand,
};
use crate::application::auth::AuthenticatedUser;
use crate::application::error::HttpError;
use crate::infra::http::repo_error_to_http;
use crate::presentation::admin::views::{AdminCategoriesTemplate, AdminCategoryRow};
use crate::presentation::views::render_template_response;

use super::AdminState;

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

pub async fn admin_categories(State(state): State<AdminState>) -> Response {
    match state.categories.list().await {
        Ok(categories) => render_template_response(
            AdminCategoriesTemplate {
                rows: categories.iter().map(AdminCategoryRow::from_record).collect(),
            },
            StatusCode::OK,
        ),
        Err(err) => category_error_to_http(err).into_response(),
    }
}

pub async fn admin_category_create(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let command = CreateCategoryCommand {
        name: form.name,
        description: normalize_optional(form.description),
        color: normalize_optional(form.color),
        icon: normalize_optional(form.icon),
    };

    match state.categories.create(&user.email, command).await {
        Ok(_) => Redirect::to("/categories").into_response(),
        Err(err) => category_error_to_http(err).into_response(),
    }
}

pub async fn admin_category_update(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let command = UpdateCategoryCommand {
        id,
        name: form.name,
        description: normalize_optional(form.description),
        color: normalize_optional(form.color),
        icon: normalize_optional(form.icon),
    };

    match state.categories.update(&user.email, command).await {
        Ok(_) => Redirect::to("/categories").into_response(),
        Err(err) => category_error_to_http(err).into_response(),
    }
}

pub async fn admin_category_delete(
    State(state): State<AdminState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.categories.delete(&user.email, id).await {
        Ok(()) => Redirect::to("/categories").into_response(),
        Err(err) => category_error_to_http(err).into_response(),
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn category_error_to_http(err: AdminCategoryError) -> HttpError {
    match err {
        AdminCategoryError::MissingField(field) => HttpError::new(
            "infra::http::admin::categories",
            StatusCode::BAD_REQUEST,
            "Missing required field",
            format!("field `{field}` is required"),
        ),
        AdminCategoryError::DuplicateSlug(slug) => HttpError::new(
            "infra::http::admin::categories",
            StatusCode::CONFLICT,
            "Slug already in use",
            slug,
        ),
        AdminCategoryError::InUse { published_posts } => HttpError::new(
            "infra::http::admin::categories",
            StatusCode::CONFLICT,
            "Category still has published posts",
            format!("{published_posts} published posts reference this category"),
        ),
        AdminCategoryError::NotFound => HttpError::new(
            "infra::http::admin::categories",
            StatusCode::NOT_FOUND,
            "Category not found",
            "category not found",
        ),
        AdminCategoryError::Repo(repo) => {
            repo_error_to_http("infra::http::admin::categories", repo)
        }
    }
}
