mod auth;
mod categories;
mod posts;
mod tags;
mod uploads;

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::{Redirect, Response},
    routing::{get, post},
};

use crate::application::admin::categories::AdminCategoryService;
use crate::application::admin::posts::AdminPostService;
use crate::application::admin::tags::AdminTagService;
use crate::application::auth::SessionService;
use crate::infra::db::PostgresRepositories;
use crate::infra::uploads::UploadStorage;

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub categories: Arc<AdminCategoryService>,
    pub tags: Arc<AdminTagService>,
    pub sessions: Arc<SessionService>,
    pub upload_storage: Arc<UploadStorage>,
    pub db: Arc<PostgresRepositories>,
    pub session_cookie: String,
}

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    // Everything except the health probe sits behind the session/role gate.
    let protected = Router::new()
        .route("/", get(admin_home))
        .route("/posts", get(posts::admin_posts))
        .route("/posts/new", get(posts::admin_post_new))
        .route("/posts/create", post(posts::admin_post_create))
        .route(
            "/posts/{id}/edit",
            get(posts::admin_post_edit).post(posts::admin_post_update),
        )
        .route("/posts/{id}/publish", post(posts::admin_post_publish))
        .route("/posts/{id}/draft", post(posts::admin_post_move_to_draft))
        .route("/posts/{id}/archive", post(posts::admin_post_archive))
        .route("/posts/{id}/delete", post(posts::admin_post_delete))
        .route("/categories", get(categories::admin_categories))
        .route("/categories/create", post(categories::admin_category_create))
        .route("/categories/{id}/edit", post(categories::admin_category_update))
        .route("/categories/{id}/delete", post(categories::admin_category_delete))
        .route("/tags", get(tags::admin_tags))
        .route("/tags/create", post(tags::admin_tag_create))
        .route("/tags/{id}/edit", post(tags::admin_tag_rename))
        .route("/tags/{id}/delete", post(tags::admin_tag_delete))
        .route(
            "/uploads",
            post(uploads::admin_upload_store).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth,
        ));

    let open = Router::new().route("/_health/db", get(admin_health));

    protected
        .merge(open)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn admin_home() -> Redirect {
    Redirect::to("/posts")
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.db.health_check().await)
}
