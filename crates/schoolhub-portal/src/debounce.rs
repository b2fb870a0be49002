//! Search-as-you-type debounce.
//!
//! A [`Debouncer`] forwards a value only after it has survived a full quiet
//! period without being replaced. [`SearchController`] puts one in front of
//! the student directory so a burst of keystrokes costs a single request.

use schoolhub_core::error::SchoolHubError;
use schoolhub_core::traits::DirectoryApi;
use schoolhub_core::types::{ListQuery, Student};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::view::LoadState;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Input side of a debounce loop. Dropping it flushes any pending value and
/// ends the loop.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the debounce loop. Settled values arrive on the returned receiver.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, mut input) = mpsc::unbounded_channel::<T>();
        let (out, settled) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => pending = Some(value),
                        None => {
                            if let Some(value) = pending.take() {
                                let _ = out.send(value);
                            }
                            break;
                        }
                    },
                    _ = tokio::time::sleep(quiet), if pending.is_some() => {
                        if let Some(value) = pending.take()
                            && out.send(value).is_err()
                        {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("debounce loop stopped");
        });

        (Self { tx }, settled)
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("debounce loop is gone, input dropped");
        }
    }
}

/// Debounced student search.
///
/// Keystrokes go in through [`input`](Self::input); results are published on a
/// `watch` channel as a [`LoadState`].
pub struct SearchController {
    debouncer: Debouncer<String>,
    state: watch::Receiver<LoadState<Vec<Student>>>,
    worker: JoinHandle<()>,
}

impl SearchController {
    pub fn new(api: Arc<dyn DirectoryApi>, quiet: Duration, limit: Option<u64>) -> Self {
        let (debouncer, mut settled) = Debouncer::<String>::spawn(quiet);
        let (tx, state) = watch::channel(LoadState::Empty);

        let worker = tokio::spawn(async move {
            while let Some(term) = settled.recv().await {
                let query = ListQuery {
                    limit,
                    ..ListQuery::search(term.clone())
                };
                let _ = tx.send(LoadState::Loading);
                tracing::debug!(%term, "student search");
                let next = match api.search_students(&query).await {
                    Ok(page) => LoadState::from_result(Ok(page.data)),
                    Err(SchoolHubError::Cancelled) => continue,
                    Err(e) => {
                        tracing::error!(%term, error = %e, "student search failed");
                        LoadState::Error(e.user_message())
                    }
                };
                if tx.send(next).is_err() {
                    break;
                }
            }
        });

        Self {
            debouncer,
            state,
            worker,
        }
    }

    pub fn input(&self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<Vec<Student>>> {
        self.state.clone()
    }

    pub fn state(&self) -> LoadState<Vec<Student>> {
        self.state.borrow().clone()
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use schoolhub_core::error::Result;
    use schoolhub_core::types::Page;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeDirectory {
        queries: Mutex<Vec<ListQuery>>,
        fail: bool,
    }

    #[async_trait]
    impl DirectoryApi for FakeDirectory {
        async fn search_students(&self, query: &ListQuery) -> Result<Page<Student>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(SchoolHubError::Http("connection refused".into()));
            }
            let term = query.search.clone().unwrap_or_default();
            Ok(Page::single(vec![Student {
                id: "s1".into(),
                first_name: term,
                last_name: "Doe".into(),
                email: None,
                grade_level: None,
                parent_id: None,
            }]))
        }
    }

    async fn type_word(search: &SearchController, word: &str, gap: Duration) {
        for end in 1..=word.len() {
            search.input(&word[..end]);
            tokio::time::sleep(gap).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_emits_only_settled_value() {
        let (debouncer, mut settled) = Debouncer::spawn(Duration::from_millis(500));
        for i in 0..5 {
            debouncer.push(i);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(settled.recv().await, Some(4));

        debouncer.push(10);
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.push(11);
        assert_eq!(settled.recv().await, Some(10));
        assert_eq!(settled.recv().await, Some(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_flushes_on_close() {
        let (debouncer, mut settled) = Debouncer::spawn(Duration::from_secs(10));
        debouncer.push("last");
        drop(debouncer);
        assert_eq!(settled.recv().await, Some("last"));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_issues_one_fetch_for_final_query() {
        let api = Arc::new(FakeDirectory::default());
        let search = SearchController::new(api.clone(), DEFAULT_QUIET_PERIOD, Some(10));
        let mut rx = search.subscribe();

        type_word(&search, "alice", Duration::from_millis(120)).await;

        rx.wait_for(|s| matches!(s, LoadState::Data(_))).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let queries = api.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search.as_deref(), Some("alice"));
        assert_eq!(queries[0].limit, Some(10));
        match search.state() {
            LoadState::Data(students) => assert_eq!(students[0].first_name, "alice"),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_failure_publishes_error() {
        let api = Arc::new(FakeDirectory {
            fail: true,
            ..Default::default()
        });
        let search = SearchController::new(api, DEFAULT_QUIET_PERIOD, None);
        let mut rx = search.subscribe();
        search.input("bob");
        let state = rx
            .wait_for(|s| matches!(s, LoadState::Error(_)))
            .await
            .unwrap()
            .clone();
        assert_eq!(
            state,
            LoadState::Error(schoolhub_core::error::GENERIC_ERROR_MESSAGE.to_string())
        );
    }
}
