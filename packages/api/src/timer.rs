//! Platform-aware timers for bounding profile store calls.

use std::future::Future;
use std::time::Duration;

use store::StoreError;

pub(crate) async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Run `fut`, failing with [`StoreError::Timeout`] once `limit` elapses.
/// `None` waits indefinitely.
pub(crate) async fn with_timeout<T>(
    limit: Option<Duration>,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    let Some(limit) = limit else {
        return fut.await;
    };
    tokio::select! {
        biased;
        result = fut => result,
        _ = sleep(limit) => Err(StoreError::Timeout),
    }
}
