use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use tracing::instrument;

use super::image_response;
use crate::error::{AppError, ErrorBody};
use crate::registry::ResizeTier;
use crate::resolve::resolve_thumbnail;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{size}/{gravity}/{path}",
    tag = "Thumbnails",
    operation_id = "getThumbnail",
    summary = "Serve a resized rendering of an original",
    description = "Renders the original at `path` filled to `{width}x{height}` and cropped \
        towards `gravity`. Renders are cached; later requests are served from the thumbnail \
        store. Supports ETag-based caching via If-None-Match.",
    params(
        ("size" = String, Path, description = "Target box as {width}x{height}, e.g. 100x100"),
        ("gravity" = String, Path, description = "center, north, northeast, east, southeast, south, southwest, west or northwest"),
        ("path" = String, Path, description = "Original path"),
    ),
    responses(
        (status = 200, description = "Thumbnail content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 400, description = "Invalid size or gravity (BAD_REQUEST)", body = ErrorBody),
        (status = 404, description = "Original not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Resize failed (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn serve_thumbnail(
    State(state): State<AppState>,
    Path((size, gravity, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let tier = ResizeTier::new(size, gravity);
    let resolved = resolve_thumbnail(&state, &tier, &path).await?;
    image_response(resolved, &headers, state.config.cache.max_age)
}
