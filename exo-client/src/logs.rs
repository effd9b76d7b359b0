//! Incremental log event store
//!
//! [`LogsStore`] keeps a bounded buffer of events for a set of watched logs
//! and publishes every change through a `watch` channel. Events are fetched
//! page by page with a server-issued cursor; each successful page is appended
//! to the buffer and the oldest events are evicted past `log_buffer_size`.
//!
//! Refreshes may overlap. Each fetch is numbered when it is issued and only
//! the most recently issued one is allowed to move the cursor or publish a
//! result; older responses are dropped on arrival.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use exo_core::domain::log::LogEvent;
use exo_core::dto::log::{GetEventsResponse, Pagination};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Result;
use crate::remote_data::RemoteData;

/// Number of events kept when no buffer size is given
pub const DEFAULT_LOG_BUFFER_SIZE: usize = 1000;

/// Where the store reads pages of events from
///
/// Implemented by [`WorkspaceClient`](crate::WorkspaceClient); tests provide
/// scripted sources.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the events of `logs` described by `pagination`
    async fn get_events(
        &self,
        logs: Vec<String>,
        pagination: Option<Pagination>,
    ) -> Result<GetEventsResponse>;
}

/// Published state of a [`LogsStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsSnapshot {
    /// Watched log names, in display order
    pub logs: Vec<String>,
    pub events: RemoteData<Vec<LogEvent>>,
    pub log_buffer_size: usize,
}

/// A fetch that has been numbered and published as in flight
struct IssuedFetch {
    seq: u64,
    logs: Vec<String>,
    cursor: Option<String>,
}

#[derive(Debug, Default)]
struct FetchState {
    cursor: Option<String>,
    /// Sequence number of the most recently issued fetch
    latest: u64,
}

/// Observable buffer of log events for a set of watched logs
pub struct LogsStore {
    source: Arc<dyn EventSource>,
    state: watch::Sender<LogsSnapshot>,
    fetch: Mutex<FetchState>,
}

impl LogsStore {
    /// Creates a store holding at most [`DEFAULT_LOG_BUFFER_SIZE`] events
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self::with_buffer_size(source, DEFAULT_LOG_BUFFER_SIZE)
    }

    pub fn with_buffer_size(source: Arc<dyn EventSource>, log_buffer_size: usize) -> Self {
        let (state, _) = watch::channel(LogsSnapshot {
            logs: Vec::new(),
            events: RemoteData::not_requested(),
            log_buffer_size,
        });

        Self {
            source,
            state,
            fetch: Mutex::new(FetchState::default()),
        }
    }

    /// Receiver observing every published state
    ///
    /// Do not hold a borrow of the receiver across calls into the store;
    /// publishing needs the channel's write lock.
    pub fn subscribe(&self) -> watch::Receiver<LogsSnapshot> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> LogsSnapshot {
        self.state.borrow().clone()
    }

    /// Cursor the next incremental refresh will read after
    pub fn cursor(&self) -> Option<String> {
        self.fetch_state().cursor.clone()
    }

    fn fetch_state(&self) -> MutexGuard<'_, FetchState> {
        self.fetch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the next page of events and merge it into the buffer
    ///
    /// With `from_start` the cursor is reset and the buffered events are
    /// dropped before the fetch, so the buffer is rebuilt from the beginning
    /// of the logs. The state moves to `Pending`/`Refetching` before the
    /// request is sent and to `Success` or `Error` when it completes. The
    /// error is also returned.
    pub async fn refresh_logs(&self, from_start: bool) -> Result<()> {
        let issued = self.issue_fetch(from_start);
        let result = self
            .source
            .get_events(issued.logs, Some(Pagination::after_cursor(issued.cursor)))
            .await;
        self.complete_fetch(issued.seq, result)
    }

    /// Number a new fetch and publish its in-flight state
    ///
    /// The fetch lock is held across the publish so that numbering and
    /// publishing are ordered the same way as in [`Self::complete_fetch`].
    fn issue_fetch(&self, from_start: bool) -> IssuedFetch {
        let mut fetch = self.fetch_state();
        if from_start {
            fetch.cursor = None;
        }
        fetch.latest += 1;
        let seq = fetch.latest;

        // The logs that request a page are the logs that page is filtered by.
        let mut logs = Vec::new();
        self.state.send_modify(|snapshot| {
            logs = snapshot.logs.clone();
            let events = std::mem::take(&mut snapshot.events);
            snapshot.events = begin_fetch(events, from_start);
        });

        let cursor = fetch.cursor.clone();
        drop(fetch);

        debug!(seq, from_start, "fetching log events");
        IssuedFetch { seq, logs, cursor }
    }

    /// Apply the result of fetch `seq` if it is still the latest one
    ///
    /// The check and the publish happen under one hold of the fetch lock; a
    /// fetch issued meanwhile waits until the result is published.
    fn complete_fetch(&self, seq: u64, result: Result<GetEventsResponse>) -> Result<()> {
        let mut fetch = self.fetch_state();
        if fetch.latest != seq {
            let latest = fetch.latest;
            drop(fetch);
            debug!(seq, latest, "discarding superseded log events");
            return result.map(drop);
        }

        match result {
            Ok(page) => {
                fetch.cursor = Some(page.cursor);
                let mut buffered = 0;
                self.state.send_modify(|snapshot| {
                    // Merge onto whatever is buffered now, not what was buffered at issue time.
                    let mut buffer = std::mem::take(&mut snapshot.events)
                        .into_data()
                        .unwrap_or_default();
                    buffer.extend(page.events);
                    evict_oldest(&mut buffer, snapshot.log_buffer_size);
                    buffered = buffer.len();
                    snapshot.events = RemoteData::success_response(buffer);
                });
                drop(fetch);
                debug!(seq, buffered, "merged log events");
                Ok(())
            }
            Err(err) => {
                self.state.send_modify(|snapshot| {
                    snapshot.events = RemoteData::error_response(err.to_string());
                });
                drop(fetch);
                warn!(seq, error = %err, "failed to fetch log events");
                Err(err)
            }
        }
    }

    /// Show or hide the events of `log`, then refresh from the beginning
    ///
    /// Showing a log already watched and hiding a log not watched leave the
    /// watched set unchanged; the refresh happens either way.
    pub async fn set_log_visibility(&self, log: &str, visible: bool) -> Result<()> {
        self.state.send_if_modified(|snapshot| {
            let watched = snapshot.logs.iter().any(|name| name == log);
            match (visible, watched) {
                (true, false) => {
                    snapshot.logs.push(log.to_string());
                    true
                }
                (false, true) => {
                    snapshot.logs.retain(|name| name != log);
                    true
                }
                _ => false,
            }
        });

        self.refresh_logs(true).await
    }
}

/// State shown while a fetch is in flight
fn begin_fetch(events: RemoteData<Vec<LogEvent>>, from_start: bool) -> RemoteData<Vec<LogEvent>> {
    match events {
        RemoteData::Idle | RemoteData::Error { .. } => RemoteData::pending_request(),
        RemoteData::Pending => RemoteData::pending_request(),
        RemoteData::Success { data } | RemoteData::Refetching { data } => {
            RemoteData::refetching_response(if from_start { Vec::new() } else { data })
        }
    }
}

/// Drop events from the front until at most `limit` remain
fn evict_oldest(buffer: &mut Vec<LogEvent>, limit: usize) {
    if buffer.len() > limit {
        let excess = buffer.len() - limit;
        buffer.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::oneshot;

    type Reply = Result<GetEventsResponse>;

    /// Source answering each call with the next queued reply
    ///
    /// Replies can be queued ready or held back with [`ScriptedSource::defer`]
    /// so a test can observe the store while a fetch is in flight.
    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        calls: Mutex<Vec<(Vec<String>, Option<Pagination>)>>,
    }

    impl ScriptedSource {
        fn respond(&self, reply: Reply) {
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(reply);
            self.replies.lock().unwrap().push_back(rx);
        }

        fn defer(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(rx);
            tx
        }

        fn calls(&self) -> Vec<(Vec<String>, Option<Pagination>)> {
            self.calls.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn get_events(
            &self,
            logs: Vec<String>,
            pagination: Option<Pagination>,
        ) -> Result<GetEventsResponse> {
            self.calls.lock().unwrap().push((logs, pagination));
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected get_events call");
            reply.await.expect("reply dropped")
        }
    }

    fn event(id: &str) -> LogEvent {
        LogEvent {
            id: id.to_string(),
            log: "web:out".to_string(),
            timestamp: Default::default(),
            message: format!("message {}", id),
        }
    }

    fn page(ids: &[&str], cursor: &str) -> Reply {
        Ok(GetEventsResponse {
            events: ids.iter().map(|id| event(id)).collect(),
            cursor: cursor.to_string(),
        })
    }

    fn ids(events: &RemoteData<Vec<LogEvent>>) -> Vec<String> {
        events
            .data()
            .map(|data| data.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default()
    }

    fn store(source: &Arc<ScriptedSource>, size: usize) -> Arc<LogsStore> {
        Arc::new(LogsStore::with_buffer_size(source.clone(), size))
    }

    async fn wait_for_calls(source: &ScriptedSource, n: usize) {
        while source.call_count() < n {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_new_store_is_idle() {
        let source = Arc::new(ScriptedSource::default());
        let store = LogsStore::new(source);
        let snapshot = store.snapshot();

        assert_eq!(snapshot.events, RemoteData::Idle);
        assert!(snapshot.logs.is_empty());
        assert_eq!(snapshot.log_buffer_size, DEFAULT_LOG_BUFFER_SIZE);
        assert!(store.cursor().is_none());
    }

    #[test]
    fn test_begin_fetch_transitions() {
        let data = vec![event("1")];

        assert_eq!(begin_fetch(RemoteData::Idle, false), RemoteData::Pending);
        assert_eq!(begin_fetch(RemoteData::Pending, false), RemoteData::Pending);
        assert_eq!(
            begin_fetch(RemoteData::error_response("x"), false),
            RemoteData::Pending
        );
        assert_eq!(
            begin_fetch(RemoteData::success_response(data.clone()), false),
            RemoteData::refetching_response(data.clone())
        );
        assert_eq!(
            begin_fetch(RemoteData::success_response(data.clone()), true),
            RemoteData::refetching_response(Vec::new())
        );
        assert_eq!(
            begin_fetch(RemoteData::refetching_response(data.clone()), false),
            RemoteData::refetching_response(data)
        );
    }

    #[test]
    fn test_evict_oldest() {
        let mut buffer = vec![event("1"), event("2"), event("3")];
        evict_oldest(&mut buffer, 2);
        assert_eq!(buffer, vec![event("2"), event("3")]);

        evict_oldest(&mut buffer, 10);
        assert_eq!(buffer.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_from_idle_is_pending_while_in_flight() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);
        let reply = source.defer();

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(false).await }
        });
        wait_for_calls(&source, 1).await;

        assert_eq!(store.snapshot().events, RemoteData::Pending);

        reply.send(page(&["1", "2"], "c1")).unwrap();
        task.await.unwrap().unwrap();

        assert_eq!(ids(&store.snapshot().events), vec!["1", "2"]);
        assert!(store.snapshot().events.is_resolved());
        assert_eq!(store.cursor().as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_incremental_refresh_appends_in_order() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&["1", "2"], "c1"));
        store.refresh_logs(false).await.unwrap();

        source.respond(page(&["3"], "c2"));
        store.refresh_logs(false).await.unwrap();

        let snapshot = store.snapshot();
        assert!(matches!(snapshot.events, RemoteData::Success { .. }));
        assert_eq!(ids(&snapshot.events), vec!["1", "2", "3"]);
        assert_eq!(store.cursor().as_deref(), Some("c2"));

        let calls = source.calls();
        assert_eq!(calls[0].1, Some(Pagination::after_cursor(None)));
        assert_eq!(
            calls[1].1,
            Some(Pagination::after_cursor(Some("c1".to_string())))
        );
    }

    #[tokio::test]
    async fn test_buffer_drops_oldest_events() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 2);

        source.respond(page(&["1", "2"], "c1"));
        store.refresh_logs(false).await.unwrap();
        source.respond(page(&["3"], "c2"));
        store.refresh_logs(false).await.unwrap();

        assert_eq!(ids(&store.snapshot().events), vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_oversized_page_keeps_tail() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 2);

        source.respond(page(&["1", "2", "3", "4"], "c1"));
        store.refresh_logs(false).await.unwrap();

        assert_eq!(ids(&store.snapshot().events), vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_refresh_from_start_drops_data_and_cursor() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);
        let mut updates = store.subscribe();

        source.respond(page(&["1", "2"], "c1"));
        store.refresh_logs(false).await.unwrap();
        updates.borrow_and_update();

        let reply = source.defer();
        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(true).await }
        });
        wait_for_calls(&source, 2).await;

        assert!(updates.has_changed().unwrap());
        assert_eq!(
            updates.borrow_and_update().events,
            RemoteData::refetching_response(Vec::new())
        );
        assert!(store.cursor().is_none());
        assert_eq!(source.calls()[1].1, Some(Pagination::after_cursor(None)));

        reply.send(page(&["1", "2", "3"], "c3")).unwrap();
        task.await.unwrap().unwrap();

        assert_eq!(ids(&store.snapshot().events), vec!["1", "2", "3"]);
        assert_eq!(store.cursor().as_deref(), Some("c3"));
    }

    #[tokio::test]
    async fn test_failure_resolves_to_error_and_keeps_cursor() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&["1"], "c1"));
        store.refresh_logs(false).await.unwrap();

        source.respond(Err(ClientError::api_error(404, "no such workspace")));
        let err = store.refresh_logs(false).await.unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(
            store.snapshot().events,
            RemoteData::error_response("API error (status 404): no such workspace")
        );
        assert_eq!(store.cursor().as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_refresh_after_error_is_pending() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(Err(ClientError::MalformedResponse("\"down\"".to_string())));
        assert!(store.refresh_logs(false).await.is_err());

        let reply = source.defer();
        let task = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(false).await }
        });
        wait_for_calls(&source, 2).await;
        assert_eq!(store.snapshot().events, RemoteData::Pending);

        reply.send(page(&["1"], "c1")).unwrap();
        task.await.unwrap().unwrap();
        assert_eq!(ids(&store.snapshot().events), vec!["1"]);
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&["1"], "c1"));
        store.refresh_logs(false).await.unwrap();

        let first = source.defer();
        let second = source.defer();
        let older = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(false).await }
        });
        wait_for_calls(&source, 2).await;
        let newer = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(true).await }
        });
        wait_for_calls(&source, 3).await;

        second.send(page(&["9"], "c9")).unwrap();
        newer.await.unwrap().unwrap();
        assert_eq!(ids(&store.snapshot().events), vec!["9"]);

        first.send(page(&["2"], "c2")).unwrap();
        older.await.unwrap().unwrap();

        assert_eq!(ids(&store.snapshot().events), vec!["9"]);
        assert_eq!(store.cursor().as_deref(), Some("c9"));
    }

    #[tokio::test]
    async fn test_superseded_failure_does_not_publish_error() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        let first = source.defer();
        let second = source.defer();
        let older = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(false).await }
        });
        wait_for_calls(&source, 1).await;
        let newer = tokio::spawn({
            let store = store.clone();
            async move { store.refresh_logs(false).await }
        });
        wait_for_calls(&source, 2).await;
        assert_eq!(store.snapshot().events, RemoteData::Pending);

        second.send(page(&["1"], "c1")).unwrap();
        newer.await.unwrap().unwrap();
        first
            .send(Err(ClientError::api_error(500, "late")))
            .unwrap();

        assert!(older.await.unwrap().is_err());
        assert_eq!(ids(&store.snapshot().events), vec!["1"]);
    }

    #[tokio::test]
    async fn test_refresh_filters_by_watched_logs_at_issue_time() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&[], "c0"));
        store.set_log_visibility("web:out", true).await.unwrap();
        source.respond(page(&[], "c1"));
        store.set_log_visibility("db:out", true).await.unwrap();

        let calls = source.calls();
        assert_eq!(calls[0].0, vec!["web:out"]);
        assert_eq!(calls[1].0, vec!["web:out", "db:out"]);
    }

    #[tokio::test]
    async fn test_show_log_twice_adds_once() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&[], "c1"));
        store.set_log_visibility("p1", true).await.unwrap();
        source.respond(page(&[], "c2"));
        store.set_log_visibility("p1", true).await.unwrap();

        assert_eq!(store.snapshot().logs, vec!["p1"]);
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_hide_unwatched_log_still_refreshes_from_start() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&["1"], "c1"));
        store.refresh_logs(false).await.unwrap();

        source.respond(page(&["1"], "c2"));
        store.set_log_visibility("p1", false).await.unwrap();

        assert!(store.snapshot().logs.is_empty());
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1, Some(Pagination::after_cursor(None)));
        assert_eq!(ids(&store.snapshot().events), vec!["1"]);
    }

    #[tokio::test]
    async fn test_hide_log_removes_it() {
        let source = Arc::new(ScriptedSource::default());
        let store = store(&source, 10);

        source.respond(page(&[], "c1"));
        store.set_log_visibility("a", true).await.unwrap();
        source.respond(page(&[], "c2"));
        store.set_log_visibility("b", true).await.unwrap();
        source.respond(page(&[], "c3"));
        store.set_log_visibility("a", false).await.unwrap();

        assert_eq!(store.snapshot().logs, vec!["b"]);
    }

    #[test]
    fn test_stale_failure_waits_behind_newer_fetch() {
        let source = Arc::new(ScriptedSource::default());
        let store = LogsStore::with_buffer_size(source, 10);

        let first = store.issue_fetch(false);
        let second = store.issue_fetch(true);
        assert!(store.cursor().is_none());

        let stale = store.complete_fetch(first.seq, Err(ClientError::api_error(500, "stale")));
        assert!(stale.is_err());
        assert_eq!(store.snapshot().events, RemoteData::Pending);

        store
            .complete_fetch(second.seq, page(&["1", "2"], "c2"))
            .unwrap();
        assert_eq!(ids(&store.snapshot().events), vec!["1", "2"]);
    }

    #[test]
    fn test_stale_page_is_not_merged_into_restarted_buffer() {
        let source = Arc::new(ScriptedSource::default());
        let store = LogsStore::with_buffer_size(source, 10);

        let initial = store.issue_fetch(false);
        store.complete_fetch(initial.seq, page(&["1"], "c1")).unwrap();

        let incremental = store.issue_fetch(false);
        assert_eq!(incremental.cursor.as_deref(), Some("c1"));
        let restart = store.issue_fetch(true);
        assert_eq!(store.snapshot().events, RemoteData::refetching_response(Vec::new()));

        store
            .complete_fetch(incremental.seq, page(&["2"], "c2"))
            .unwrap();
        assert_eq!(store.snapshot().events, RemoteData::refetching_response(Vec::new()));

        store
            .complete_fetch(restart.seq, page(&["1", "2"], "c2"))
            .unwrap();
        assert_eq!(ids(&store.snapshot().events), vec!["1", "2"]);
        assert_eq!(store.cursor().as_deref(), Some("c2"));
    }

    /// Source answering every call with one fresh event
    #[derive(Default)]
    struct CountingSource {
        next: AtomicU64,
    }

    #[async_trait]
    impl EventSource for CountingSource {
        async fn get_events(
            &self,
            _logs: Vec<String>,
            _pagination: Option<Pagination>,
        ) -> Result<GetEventsResponse> {
            tokio::task::yield_now().await;
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            Ok(GetEventsResponse {
                events: vec![event(&n.to_string())],
                cursor: format!("c{}", n),
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_restarts_keep_only_latest_page() {
        let store = Arc::new(LogsStore::with_buffer_size(
            Arc::new(CountingSource::default()),
            100,
        ));

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.refresh_logs(true).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let snapshot = store.snapshot();
        assert!(matches!(snapshot.events, RemoteData::Success { .. }));
        assert_eq!(ids(&snapshot.events).len(), 1);
    }

    #[test]
    fn test_snapshot_serializes_for_ui() {
        let source = Arc::new(ScriptedSource::default());
        let store = LogsStore::with_buffer_size(source, 5);

        let value = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "logs": [], "events": { "stage": "idle" }, "logBufferSize": 5 })
        );
    }
}
