use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::application::error::HttpError;
use crate::infra::uploads::UploadStorageError;

use super::AdminState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub size_bytes: i64,
    pub checksum: String,
}

/// Accept one `file` part, enforce the image/size policy, and answer with
/// the public URL of the stored asset.
pub async fn admin_upload_store(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Response {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return HttpError::new(
                    "infra::http::admin::uploads",
                    StatusCode::BAD_REQUEST,
                    "Missing file part",
                    "multipart request carried no `file` part",
                )
                .into_response();
            }
            Err(err) => {
                return HttpError::new(
                    "infra::http::admin::uploads",
                    StatusCode::BAD_REQUEST,
                    "Malformed upload",
                    err.to_string(),
                )
                .into_response();
            }
        }
    };

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);

    if let Err(err) = state
        .upload_storage
        .check_content_type(&original_name, content_type.as_deref())
    {
        return upload_error_to_http(err).into_response();
    }

    let data = match field.bytes().await {
        Ok(data) => data,
        Err(err) => {
            return HttpError::new(
                "infra::http::admin::uploads",
                StatusCode::BAD_REQUEST,
                "Upload stream failed",
                err.to_string(),
            )
            .into_response();
        }
    };

    match state.upload_storage.store(&original_name, data).await {
        Ok(stored) => {
            info!(
                target = "bytebrief::admin::uploads",
                path = %stored.stored_path,
                size_bytes = stored.size_bytes,
                "image stored"
            );
            Json(UploadResponse {
                url: stored.public_url,
                size_bytes: stored.size_bytes,
                checksum: stored.checksum,
            })
            .into_response()
        }
        Err(err) => upload_error_to_http(err).into_response(),
    }
}

fn upload_error_to_http(err: UploadStorageError) -> HttpError {
    let source = "infra::http::admin::uploads";
    match err {
        UploadStorageError::PayloadTooLarge { limit_bytes } => HttpError::new(
            source,
            StatusCode::PAYLOAD_TOO_LARGE,
            "Upload too large",
            format!("upload exceeds the {limit_bytes} byte ceiling"),
        ),
        UploadStorageError::UnsupportedType { content_type } => HttpError::new(
            source,
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Images only",
            format!("unsupported content type `{content_type}`"),
        ),
        UploadStorageError::EmptyPayload => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Empty upload",
            "uploaded file is empty",
        ),
        other => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Upload failed",
            other.to_string(),
        ),
    }
}
