pub mod config;
pub mod error;
pub mod handlers;
pub mod imaging;
pub mod middleware;
pub mod registry;
pub mod resolve;
pub mod routes;
pub mod state;

use axum::Json;
use axum::routing::get;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resizer API",
        version = "1.0.0",
        description = "Serves uploaded images and cached, on-demand thumbnails"
    ),
    paths(
        handlers::thumbnail::serve_thumbnail,
        handlers::original::serve_original,
        handlers::original::upload_original,
        handlers::original::delete_original,
    ),
    components(schemas(error::ErrorBody)),
    tags(
        (name = "Thumbnails", description = "Resized renderings of originals"),
        (name = "Originals", description = "Uploading, serving and deleting originals"),
    ),
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router.
///
/// `/scalar` and `/favicon.ico` are static routes, so originals stored under
/// those names cannot be fetched at the top level.
pub fn build_router(state: AppState) -> axum::Router {
    routes::routes(&state)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
