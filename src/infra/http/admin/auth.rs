//! Centralized session/role gate for every admin surface.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::application::auth::AuthError;
use crate::application::error::HttpError;
use crate::infra::http::repo_error_to_http;

use super::AdminState;

pub async fn admin_auth(
    State(state): State<AdminState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = jar
        .get(&state.session_cookie)
        .map(|cookie| cookie.value().to_string());

    let user = match state.sessions.require_admin(token.as_deref()).await {
        Ok(user) => user,
        Err(err) => return auth_error_to_response(err),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn auth_error_to_response(err: AuthError) -> Response {
    match err {
        AuthError::Missing | AuthError::Invalid | AuthError::Expired => HttpError::new(
            "infra::http::admin::auth",
            StatusCode::UNAUTHORIZED,
            "Sign-in required",
            err.to_string(),
        )
        .into_response(),
        AuthError::Forbidden => HttpError::new(
            "infra::http::admin::auth",
            StatusCode::FORBIDDEN,
            "Administrator role required",
            err.to_string(),
        )
        .into_response(),
        AuthError::Repo(repo) => {
            repo_error_to_http("infra::http::admin::auth", repo).into_response()
        }
    }
}
