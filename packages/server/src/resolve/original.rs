use tracing::instrument;

use super::{ResolveError, Resolved, original_error};
use crate::state::AppState;

/// Serve an original as uploaded. Originals are never computed, so this is a
/// plain fetch followed by type sniffing and ETag issue.
#[instrument(skip(state))]
pub async fn resolve_original(state: &AppState, path: &str) -> Result<Resolved, ResolveError> {
    let body = state
        .originals
        .get(path)
        .await
        .map_err(|e| original_error(path, e))?;

    let content_type = state.transformer.determine_type(&body);
    let etag = state.etags.issue(&body);
    Ok(Resolved {
        body,
        content_type,
        etag,
    })
}

/// Store (or overwrite) the original at `path`.
///
/// Thumbnails rendered from a previous upload are left in place.
#[instrument(skip(state, data), fields(bytes = data.len()))]
pub async fn store_original(state: &AppState, path: &str, data: &[u8]) -> Result<(), ResolveError> {
    if data.is_empty() {
        return Err(ResolveError::BadRequest("upload is empty".into()));
    }
    state.originals.put(path, data).await.map_err(|e| match e {
        common::storage::StorageError::InvalidKey(msg) => ResolveError::BadRequest(msg),
        other => ResolveError::Internal(format!("store original {path}: {other}")),
    })
}
