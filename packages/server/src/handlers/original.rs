use axum::body::Body;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use tracing::instrument;

use super::image_response;
use crate::error::{AppError, ErrorBody};
use crate::resolve;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file cap.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn upload_body_limit(max_bytes: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(usize::try_from(max_bytes + MULTIPART_OVERHEAD).unwrap_or(usize::MAX))
}

#[utoipa::path(
    get,
    path = "/{path}",
    tag = "Originals",
    operation_id = "getOriginal",
    summary = "Serve an original as uploaded",
    description = "Supports ETag-based caching via If-None-Match.",
    params(("path" = String, Path, description = "Original path")),
    responses(
        (status = 200, description = "Original content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Original not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn serve_original(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let resolved = resolve::resolve_original(&state, &path).await?;
    image_response(resolved, &headers, state.config.cache.max_age)
}

#[utoipa::path(
    post,
    path = "/{path}",
    tag = "Originals",
    operation_id = "uploadOriginal",
    summary = "Upload or replace an original",
    description = "Accepts the image as the raw request body, or as the `file` field of a \
        multipart/form-data body. Bodies that reach the configured cap (50 MiB by default) \
        are rejected.",
    params(("path" = String, Path, description = "Original path")),
    request_body(content_type = "application/octet-stream", description = "Image bytes"),
    responses(
        (status = 201, description = "Original stored"),
        (status = 400, description = "Empty or unreadable upload (BAD_REQUEST)", body = ErrorBody),
        (status = 413, description = "Upload too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, request))]
pub async fn upload_original(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<impl IntoResponse, AppError> {
    let limit = state.config.upload.max_bytes;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let data = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
        read_multipart_file(multipart, limit).await?
    } else {
        read_body(request.into_body(), limit).await?
    };

    resolve::store_original(&state, &path, &data).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/{path}",
    tag = "Originals",
    operation_id = "deleteOriginal",
    summary = "Delete an original and every thumbnail rendered from it",
    params(("path" = String, Path, description = "Original path")),
    responses(
        (status = 204, description = "Original deleted"),
        (status = 404, description = "Original not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_original(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    resolve::delete_original(&state, &path).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append `chunk`, rejecting the upload once it reaches `limit` bytes.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], limit: u64) -> Result<(), AppError> {
    if (buf.len() + chunk.len()) as u64 >= limit {
        return Err(AppError::PayloadTooLarge { limit });
    }
    buf.extend_from_slice(chunk);
    Ok(())
}

async fn read_body(body: Body, limit: u64) -> Result<Vec<u8>, AppError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
        append_capped(&mut buf, &chunk, limit)?;
    }
    Ok(buf)
}

async fn read_multipart_file(mut multipart: Multipart, limit: u64) -> Result<Vec<u8>, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }

        let mut buf = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            append_capped(&mut buf, &chunk, limit)?;
        }
        return Ok(buf);
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}
