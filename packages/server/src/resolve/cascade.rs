use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use super::{ResolveError, original_error};
use crate::state::AppState;

/// Upper bound on concurrent thumbnail removals per cascade.
const CASCADE_CONCURRENCY: usize = 8;

/// Remove the original at `path`, then every thumbnail derived from it.
///
/// The cascade runs whether or not the original was present; the returned
/// result reflects only the original's removal.
#[instrument(skip(state))]
pub async fn delete_original(state: &AppState, path: &str) -> Result<(), ResolveError> {
    let removed = state
        .originals
        .remove(path)
        .await
        .map_err(|e| original_error(path, e));

    let thumbnails = cascade_delete(state, path).await;
    info!(thumbnails, original_removed = removed.is_ok(), "delete finished");

    removed
}

/// Best-effort removal of `tier + path` for every registered tier.
///
/// Individual failures are logged and skipped. Returns how many thumbnails
/// were actually removed.
pub async fn cascade_delete(state: &AppState, path: &str) -> usize {
    let tiers = state.tiers.enumerate();

    stream::iter(tiers)
        .map(move |tier| async move {
            let key = format!("{tier}{path}");
            let result = state.thumbnails.remove(&key).await;
            (key, result)
        })
        .buffer_unordered(CASCADE_CONCURRENCY)
        .filter(|(key, result)| {
            let removed = match result {
                Ok(()) => true,
                Err(err) if err.is_not_found() => {
                    debug!(key = %key, "no thumbnail at tier");
                    false
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "failed to remove thumbnail");
                    false
                }
            };
            futures::future::ready(removed)
        })
        .count()
        .await
}
