use axum::Router;
use axum::middleware;
use axum::routing::{any, get, post};

use crate::handlers;
use crate::state::AppState;

/// `/{size}/{gravity}/{path}` for thumbnails, `/{path}` for originals.
///
/// The ETag pre-check only wraps the GET/HEAD handlers.
///
/// The router needs the leading parameter to carry one name across both
/// routes; for thumbnails that segment holds the size. Extraction is
/// positional, so handlers see `(size, gravity, path)`.
pub fn routes(state: &AppState) -> Router<AppState> {
    let precheck = middleware::from_fn_with_state(state.clone(), crate::middleware::etag_precheck);

    let thumbnails = get(handlers::thumbnail::serve_thumbnail).layer(precheck.clone());

    let originals = get(handlers::original::serve_original)
        .layer(precheck)
        .merge(
            post(handlers::original::upload_original).layer(handlers::original::upload_body_limit(
                state.config.upload.max_bytes,
            )),
        )
        .delete(handlers::original::delete_original);

    Router::new()
        .route("/favicon.ico", any(handlers::favicon))
        .route("/{path}/{gravity}/{original}", thumbnails)
        .route("/{path}", originals)
}
