//! Search coordination
//!
//! [`SearchCoordinator`] owns the user-facing [`SearchState`] and updates it
//! once per settled search. Each call to [`SearchCoordinator::search`] is
//! tagged with a sequence number when it is issued; only the most recently
//! issued search may update the state, so a slow earlier response can never
//! overwrite a newer one. A latest search whose future is dropped before it
//! settles rolls the state back to the last settled search.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::PhotoSearch;
use crate::config::MessagesConfig;
use crate::error::SearchOutcome;
use crate::types::{PhotoResult, SearchState, SearchStatus};

/// What happened to a search once it settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome was written to the state
    Applied(SearchStatus),
    /// A newer search was issued meanwhile; the outcome was dropped
    Stale,
}

struct Inner {
    state: SearchState,
    /// Sequence number of the most recently issued search
    latest: u64,
    /// Keyword and status as of the last applied settlement
    settled_keyword: String,
    settled_status: SearchStatus,
}

/// Rolls the state back if a search future is dropped before it settles
struct PendingSearch<'a> {
    coordinator: &'a SearchCoordinator,
    sequence: u64,
    settled: bool,
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.abandon(self.sequence);
        }
    }
}

/// Owner of the search state exposed to the presentation layer
pub struct SearchCoordinator {
    search: Arc<dyn PhotoSearch>,
    messages: MessagesConfig,
    inner: Mutex<Inner>,
}

impl SearchCoordinator {
    pub fn new(search: Arc<dyn PhotoSearch>, messages: MessagesConfig) -> Self {
        let state = SearchState::idle(messages.prompt.clone());
        Self {
            search,
            messages,
            inner: Mutex::new(Inner {
                state,
                latest: 0,
                settled_keyword: String::new(),
                settled_status: SearchStatus::Idle,
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    /// Whether the most recently issued search is still outstanding
    pub fn is_loading(&self) -> bool {
        self.lock().state.status == SearchStatus::Loading
    }

    /// Issue a search for `keyword`
    ///
    /// The search is registered (and the state enters `Loading`) as soon as
    /// this is called; the returned future performs the query and settles it.
    /// Overlapping searches are allowed. Prior results and message stay
    /// visible until the latest search settles.
    ///
    /// Dropping the future unsettled (never awaited, timed out, lost a
    /// `select!`) abandons the search: if it is still the latest, keyword and
    /// status return to those of the last settled search.
    pub fn search(&self, keyword: &str) -> impl Future<Output = Settlement> + Send + '_ {
        let keyword = keyword.to_string();
        let mut pending = PendingSearch {
            coordinator: self,
            sequence: self.begin(&keyword),
            settled: false,
        };

        async move {
            let outcome = self.search.find_all_by_keyword(&keyword).await;
            pending.settled = true;
            self.settle(pending.sequence, outcome)
        }
    }

    fn begin(&self, keyword: &str) -> u64 {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state.keyword = keyword.to_string();
        inner.state.status = SearchStatus::Loading;

        tracing::debug!(sequence = inner.latest, keyword, "search issued");
        inner.latest
    }

    fn settle(&self, sequence: u64, outcome: SearchOutcome<Vec<PhotoResult>>) -> Settlement {
        let mut inner = self.lock();
        if sequence != inner.latest {
            tracing::debug!(
                sequence,
                latest = inner.latest,
                "discarding stale search result"
            );
            return Settlement::Stale;
        }

        let state = &mut inner.state;
        match outcome {
            Ok(results) => {
                state.message = if results.is_empty() {
                    self.messages.empty.clone()
                } else {
                    self.messages.prompt.clone()
                };
                state.results = results;
                state.status = SearchStatus::Success;
            }
            Err(e) => {
                tracing::warn!("Search for '{}' failed: {}", state.keyword, e);
                state.results.clear();
                state.message = self.messages.error.clone();
                state.status = SearchStatus::Failed;
            }
        }

        let status = state.status;
        inner.settled_keyword = inner.state.keyword.clone();
        inner.settled_status = status;
        Settlement::Applied(status)
    }

    fn abandon(&self, sequence: u64) {
        let mut inner = self.lock();
        if sequence != inner.latest {
            return;
        }

        tracing::debug!(sequence, "search dropped before settling");
        inner.state.keyword = inner.settled_keyword.clone();
        inner.state.status = inner.settled_status;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every update completes under the lock, so a poisoned guard is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SearchError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    type Reply = SearchOutcome<Vec<PhotoResult>>;

    fn photo(title: &str, image: &str) -> PhotoResult {
        PhotoResult {
            image: image.to_string(),
            link: format!("https://example.com/{}", title),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn coordinator(search: impl PhotoSearch + 'static) -> SearchCoordinator {
        SearchCoordinator::new(Arc::new(search), MessagesConfig::default())
    }

    /// Search that answers every keyword the same way
    struct FixedSearch(fn() -> Reply);

    #[async_trait]
    impl PhotoSearch for FixedSearch {
        async fn find_all_by_keyword(&self, _keyword: &str) -> Reply {
            (self.0)()
        }
    }

    /// Search whose replies are released by the test, one gate per keyword
    #[derive(Default)]
    struct GatedSearch {
        gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    impl GatedSearch {
        fn gate(&self, keyword: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(keyword.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl PhotoSearch for GatedSearch {
        async fn find_all_by_keyword(&self, keyword: &str) -> Reply {
            let rx = self.gates.lock().unwrap().remove(keyword);
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(SearchError::Transport("gate dropped".into()))),
                None => Err(SearchError::Transport(format!("no gate for {}", keyword))),
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let coordinator = coordinator(FixedSearch(|| Ok(Vec::new())));
        let state = coordinator.state();

        assert_eq!(state.message, "Enter a keyword.");
        assert!(state.results.is_empty());
        assert_eq!(state.status, SearchStatus::Idle);
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn test_search_success() {
        let coordinator = coordinator(FixedSearch(|| {
            Ok(vec![photo("One", "foo.jpg"), photo("Two", "bar.jpg")])
        }));

        let settlement = coordinator.search("test").await;
        let state = coordinator.state();

        assert_eq!(settlement, Settlement::Applied(SearchStatus::Success));
        assert_eq!(state.keyword, "test");
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.results[0].title, "One");
        assert_eq!(state.results[1].image, "bar.jpg");
        assert_eq!(state.message, "Enter a keyword.");
    }

    #[tokio::test]
    async fn test_search_failure() {
        let coordinator =
            coordinator(FixedSearch(|| Err(SearchError::Transport("boom".into()))));

        let settlement = coordinator.search("x").await;
        let state = coordinator.state();

        assert_eq!(settlement, Settlement::Applied(SearchStatus::Failed));
        assert!(state.results.is_empty());
        assert_eq!(state.message, "There was an error.");
    }

    #[tokio::test]
    async fn test_malformed_payload_looks_like_any_failure() {
        let coordinator =
            coordinator(FixedSearch(|| Err(ParseError::MissingItems.into())));

        coordinator.search("x").await;
        let state = coordinator.state();

        assert_eq!(state.status, SearchStatus::Failed);
        assert_eq!(state.message, "There was an error.");
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let coordinator = coordinator(FixedSearch(|| Ok(Vec::new())));

        coordinator.search("x").await;
        let state = coordinator.state();

        assert_eq!(state.status, SearchStatus::Success);
        assert!(state.results.is_empty());
        assert_ne!(state.message, "There was an error.");
        assert_eq!(state.message, "No photos found.");
    }

    #[tokio::test]
    async fn test_empty_keyword_passes_through() {
        let gated = Arc::new(GatedSearch::default());
        let tx = gated.gate("");
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let pending = coordinator.search("");
        tx.send(Ok(Vec::new())).unwrap();

        assert_eq!(
            pending.await,
            Settlement::Applied(SearchStatus::Success)
        );
        assert_eq!(coordinator.state().keyword, "");
    }

    #[tokio::test]
    async fn test_loading_keeps_prior_results() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let tx = gated.gate("cats");
        let pending = coordinator.search("cats");
        tx.send(Ok(vec![photo("cat", "cat.jpg")])).unwrap();
        pending.await;

        let tx = gated.gate("dogs");
        let pending = coordinator.search("dogs");

        let state = coordinator.state();
        assert!(coordinator.is_loading());
        assert_eq!(state.keyword, "dogs");
        assert_eq!(state.results, vec![photo("cat", "cat.jpg")]);

        tx.send(Err(SearchError::Transport("down".into()))).unwrap();
        pending.await;

        let state = coordinator.state();
        assert!(!coordinator.is_loading());
        assert!(state.results.is_empty());
        assert_eq!(state.message, "There was an error.");
    }

    #[tokio::test]
    async fn test_recovers_after_failure() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let tx = gated.gate("a");
        let pending = coordinator.search("a");
        tx.send(Err(SearchError::Transport("down".into()))).unwrap();
        pending.await;
        assert_eq!(coordinator.state().message, "There was an error.");

        let tx = gated.gate("b");
        let pending = coordinator.search("b");
        tx.send(Ok(vec![photo("b", "b.jpg")])).unwrap();
        pending.await;

        let state = coordinator.state();
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(state.message, "Enter a keyword.");
        assert_eq!(state.results.len(), 1);
    }

    // Policy: the most recently issued search wins, whatever order replies settle in.

    #[tokio::test]
    async fn test_overlap_newer_settles_first_older_is_discarded() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let first_tx = gated.gate("first");
        let second_tx = gated.gate("second");
        let first = coordinator.search("first");
        let second = coordinator.search("second");

        second_tx.send(Ok(vec![photo("second", "2.jpg")])).unwrap();
        assert_eq!(second.await, Settlement::Applied(SearchStatus::Success));

        first_tx.send(Ok(vec![photo("first", "1.jpg")])).unwrap();
        assert_eq!(first.await, Settlement::Stale);

        let state = coordinator.state();
        assert_eq!(state.keyword, "second");
        assert_eq!(state.results, vec![photo("second", "2.jpg")]);
        assert_eq!(state.status, SearchStatus::Success);
    }

    #[tokio::test]
    async fn test_overlap_stale_failure_does_not_clear_results() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let first_tx = gated.gate("first");
        let second_tx = gated.gate("second");
        let first = coordinator.search("first");
        let second = coordinator.search("second");

        second_tx.send(Ok(vec![photo("second", "2.jpg")])).unwrap();
        second.await;
        first_tx
            .send(Err(SearchError::Transport("late".into())))
            .unwrap();
        first.await;

        let state = coordinator.state();
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.message, "Enter a keyword.");
    }

    #[tokio::test]
    async fn test_overlap_older_settles_first_is_replaced() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let first_tx = gated.gate("first");
        let second_tx = gated.gate("second");
        let first = coordinator.search("first");
        let second = coordinator.search("second");

        // The older search is already superseded when it settles
        first_tx.send(Ok(vec![photo("first", "1.jpg")])).unwrap();
        assert_eq!(first.await, Settlement::Stale);
        assert!(coordinator.is_loading());

        second_tx.send(Ok(Vec::new())).unwrap();
        assert_eq!(second.await, Settlement::Applied(SearchStatus::Success));

        let state = coordinator.state();
        assert!(state.results.is_empty());
        assert_eq!(state.message, "No photos found.");
    }

    #[tokio::test]
    async fn test_overlapping_searches_joined() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let first_tx = gated.gate("first");
        let second_tx = gated.gate("second");
        second_tx.send(Ok(vec![photo("second", "2.jpg")])).unwrap();
        first_tx.send(Ok(vec![photo("first", "1.jpg")])).unwrap();

        let (first, second) =
            tokio::join!(coordinator.search("first"), coordinator.search("second"));

        assert_eq!(first, Settlement::Stale);
        assert_eq!(second, Settlement::Applied(SearchStatus::Success));
        assert_eq!(coordinator.state().results[0].title, "second");
    }

    #[tokio::test]
    async fn test_timed_out_search_does_not_stay_loading() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        // Held open so the search never answers
        let _tx = gated.gate("cats");
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            coordinator.search("cats"),
        )
        .await;
        assert!(result.is_err());

        let state = coordinator.state();
        assert!(!coordinator.is_loading());
        assert_eq!(state.status, SearchStatus::Idle);
        assert_eq!(state.keyword, "");
        assert_eq!(state.message, "Enter a keyword.");
    }

    #[tokio::test]
    async fn test_never_awaited_search_rolls_back_to_last_settled() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let tx = gated.gate("cats");
        let pending = coordinator.search("cats");
        tx.send(Ok(vec![photo("cat", "cat.jpg")])).unwrap();
        pending.await;

        drop(coordinator.search("dogs"));

        let state = coordinator.state();
        assert!(!coordinator.is_loading());
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(state.keyword, "cats");
        assert_eq!(state.results, vec![photo("cat", "cat.jpg")]);
    }

    #[tokio::test]
    async fn test_dropping_superseded_search_keeps_latest_loading() {
        let gated = Arc::new(GatedSearch::default());
        let coordinator = SearchCoordinator::new(gated.clone(), MessagesConfig::default());

        let second_tx = gated.gate("second");
        let first = coordinator.search("first");
        let second = coordinator.search("second");

        drop(first);
        let state = coordinator.state();
        assert!(coordinator.is_loading());
        assert_eq!(state.keyword, "second");

        second_tx.send(Ok(vec![photo("second", "2.jpg")])).unwrap();
        assert_eq!(second.await, Settlement::Applied(SearchStatus::Success));
        assert_eq!(coordinator.state().keyword, "second");
    }
}
