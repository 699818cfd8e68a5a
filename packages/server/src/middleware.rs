//! Coarse conditional-request check run in front of every image read.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::handlers::not_modified;
use crate::state::AppState;

/// Answer 304 when `If-None-Match` names any tag the registry has issued.
///
/// Membership is registry-wide, so a tag issued for one resource satisfies a
/// request for another. Handlers repeat the check against the exact tag of
/// the buffer they resolve.
pub async fn etag_precheck(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(value) = req.headers().get(header::IF_NONE_MATCH)
        && let Ok(tag) = value.to_str()
        && !tag.is_empty()
        && state.etags.contains(tag)
    {
        tracing::debug!(tag, "If-None-Match hit in registry");
        return not_modified(value.clone());
    }

    next.run(req).await
}
