use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

/// Per-key single-builder/many-waiters map for thumbnail renders.
///
/// The first caller for a key runs the build; callers arriving while it runs
/// wait for its result instead of rendering again. A failed build is not
/// shared: the next waiter in line runs its own build.
#[derive(Default)]
pub struct InflightBuilds {
    builds: DashMap<String, Arc<OnceCell<Vec<u8>>>>,
}

impl InflightBuilds {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, Fut, E>(&self, key: &str, build: F) -> Result<Vec<u8>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, E>>,
    {
        let cell = self
            .builds
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell.get_or_try_init(build).await.cloned();

        self.builds
            .remove_if(key, |_, current| Arc::ptr_eq(current, &cell));
        result
    }

    /// Whether no build is in progress.
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}
