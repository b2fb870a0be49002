//! Per-view render state and lifetime-bound cancellation.

use schoolhub_core::error::{Result, SchoolHubError};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// The four-valued render switch every page has.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum LoadState<T> {
    Loading,
    Error(String),
    Empty,
    Data(T),
}

impl<U> LoadState<Vec<U>> {
    pub fn from_result(result: Result<Vec<U>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => LoadState::Empty,
            Ok(items) => LoadState::Data(items),
            Err(e) => LoadState::Error(e.user_message()),
        }
    }
}

#[derive(Debug, Default)]
struct ScopeInner {
    closed: AtomicBool,
    notify: Notify,
}

/// Cancellation tied to a view's lifetime.
///
/// Work started through [`ViewScope::run`] resolves to `Cancelled` as soon as
/// the scope closes, so a late response never reaches a torn-down view.
/// Dropping the scope closes it.
#[derive(Debug, Default)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

/// Handle that closes a [`ViewScope`] from elsewhere (another task, a
/// navigation handler).
#[derive(Debug, Clone)]
pub struct ScopeCanceller {
    inner: Arc<ScopeInner>,
}

impl ScopeCanceller {
    pub fn cancel(&self) {
        close(&self.inner);
    }
}

fn close(inner: &ScopeInner) {
    if !inner.closed.swap(true, Ordering::SeqCst) {
        inner.notify.notify_waiters();
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canceller(&self) -> ScopeCanceller {
        ScopeCanceller {
            inner: self.inner.clone(),
        }
    }

    pub fn close(&self) {
        close(&self.inner);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Race `fut` against the scope closing.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a close in between is not missed.
        notified.as_mut().enable();
        if self.is_closed() {
            return Err(SchoolHubError::Cancelled);
        }
        tokio::select! {
            _ = &mut notified => {
                tracing::debug!("view closed, dropping in-flight request");
                Err(SchoolHubError::Cancelled)
            }
            result = fut => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        close(&self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_state_from_result() {
        assert_eq!(LoadState::from_result(Ok(Vec::<u8>::new())), LoadState::Empty);
        assert_eq!(LoadState::from_result(Ok(vec![1, 2])), LoadState::Data(vec![1, 2]));
        assert!(matches!(
            LoadState::<Vec<u8>>::from_result(Err(SchoolHubError::Http("down".into()))),
            LoadState::Error(_)
        ));
    }

    #[tokio::test]
    async fn test_run_completes_while_open() {
        let scope = ViewScope::new();
        let v = scope.run(async { Ok::<_, SchoolHubError>(7) }).await.unwrap();
        assert_eq!(v, 7);
    }

    #[tokio::test]
    async fn test_run_on_closed_scope_is_cancelled() {
        let scope = ViewScope::new();
        scope.close();
        let r = scope.run(async { Ok::<_, SchoolHubError>(()) }).await;
        assert!(matches!(r, Err(SchoolHubError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_in_flight_work() {
        let scope = ViewScope::new();
        let canceller = scope.canceller();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let r = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, SchoolHubError>("late response")
            })
            .await;
        assert!(matches!(r, Err(SchoolHubError::Cancelled)));
        assert!(scope.is_closed());
    }

    #[test]
    fn test_drop_closes_scope() {
        let scope = ViewScope::new();
        let canceller = scope.canceller();
        drop(scope);
        assert!(canceller.inner.closed.load(Ordering::SeqCst));
    }
}
