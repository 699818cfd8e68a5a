use tracing::{debug, instrument, warn};

use super::{ResolveError, Resolved, original_error};
use crate::registry::ResizeTier;
use crate::state::AppState;

/// Serve `path` rendered at `tier`, from the thumbnail store when possible.
///
/// The tier is registered before anything else so a later delete of `path`
/// reaches this thumbnail key even if the render below fails. A miss falls
/// through to the original: it is fetched, the tier is parsed, the buffer is
/// resized and written back. A failed write-back is logged and the fresh
/// render is still returned.
#[instrument(skip(state, tier), fields(tier = %tier))]
pub async fn resolve_thumbnail(
    state: &AppState,
    tier: &ResizeTier,
    path: &str,
) -> Result<Resolved, ResolveError> {
    state.tiers.add(tier);

    let key = tier.thumbnail_key(path);
    let body = match state.thumbnails.get(&key).await {
        Ok(buf) => {
            debug!(key = %key, "thumbnail cache hit");
            buf
        }
        Err(err) => {
            if !err.is_not_found() {
                warn!(key = %key, error = %err, "thumbnail lookup failed, rendering");
            }
            match &state.inflight {
                Some(inflight) => inflight.run(&key, || render(state, tier, path, &key)).await?,
                None => render(state, tier, path, &key).await?,
            }
        }
    };

    let content_type = state.transformer.determine_type(&body);
    let etag = state.etags.issue(&body);
    Ok(Resolved {
        body,
        content_type,
        etag,
    })
}

async fn render(
    state: &AppState,
    tier: &ResizeTier,
    path: &str,
    key: &str,
) -> Result<Vec<u8>, ResolveError> {
    let source = state
        .originals
        .get(path)
        .await
        .map_err(|e| original_error(path, e))?;

    let options = tier
        .options(state.config.thumbnails.max_dimension)
        .map_err(|e| ResolveError::BadRequest(e.to_string()))?;

    let transformer = state.transformer.clone();
    let rendered = tokio::task::spawn_blocking(move || transformer.resize(&source, &options))
        .await
        .map_err(|e| ResolveError::Internal(format!("resize task failed: {e}")))?
        .map_err(|e| ResolveError::Internal(format!("resize {path} at {tier}: {e}")))?;

    match state.thumbnails.put(key, &rendered).await {
        Ok(()) => debug!(key, bytes = rendered.len(), "thumbnail stored"),
        Err(err) => warn!(key, error = %err, "failed to store thumbnail"),
    }

    Ok(rendered)
}
