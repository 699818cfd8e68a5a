pub mod original;
pub mod thumbnail;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::resolve::Resolved;

/// Answer with the resolved image, or 304 when the request already holds
/// exactly this buffer's tag.
pub(crate) fn image_response(
    resolved: Resolved,
    headers: &HeaderMap,
    max_age: u64,
) -> Result<Response, AppError> {
    let etag = HeaderValue::from_str(&resolved.etag)
        .map_err(|e| AppError::Internal(format!("Invalid ETag header: {e}")))?;

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == resolved.etag.as_bytes()
    {
        return Ok(not_modified(etag));
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(resolved.content_type)),
            (header::ETAG, etag),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_str(&format!("public, max-age={max_age}"))
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            ),
        ],
        resolved.body,
    )
        .into_response())
}

pub(crate) fn not_modified(etag: HeaderValue) -> Response {
    (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response()
}

/// Browsers probe this on every page; there is never an icon to serve.
pub async fn favicon() -> AppError {
    AppError::NotFound("No favicon".into())
}
