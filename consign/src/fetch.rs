//! Fetch orchestration for one paginated table.
//!
//! A [`Pager`] owns the table's [`QueryState`] and turns every query change
//! into exactly one request against a [`CollectionSource`]. Requests run as
//! spawned tokio tasks and report back over an mpsc channel; the owner
//! drives [`Pager::next_event`] from its event loop, which is where results
//! are committed.
//!
//! # Ordering
//!
//! Each request carries a [`RequestId`]. Only a completion whose id is the
//! most recently issued one may commit; anything older is discarded no
//! matter when it arrives. Superseded tasks are not aborted (reads have no
//! side effects), they simply lose.
//!
//! ```text
//!   set_filter("a")  ──► #1 ─────────────────────────┐ (arrives late)
//!   set_filter("ab") ──► #2 ───────┐                 │
//!                                  v                 v
//!                            commit #2        discard #1
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::DEFAULT_DEBOUNCE;
use crate::error::Result;
use crate::query::{FilterValue, PageIndex, PageQuery, PageRequest, QueryState};
use crate::resource::Resource;
use crate::rest::ConsignHttpClient;
use crate::types::PageResult;
use crate::view::{Column, TableIntent, TableProps, ViewState};

// ---------------------------------------------------------------------------
// Collection sources
// ---------------------------------------------------------------------------

/// A collection endpoint the pager can page through.
pub trait CollectionSource: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    fn fetch(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageResult<Self::Item>>> + Send;
}

/// HTTP-backed source for a [`Resource`] collection.
pub struct Collection<R> {
    http: Arc<ConsignHttpClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Collection<R> {
    pub fn new(http: Arc<ConsignHttpClient>) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.http))
    }
}

impl<R: Resource> CollectionSource for Collection<R> {
    type Item = R;

    fn fetch(&self, request: PageRequest) -> impl Future<Output = Result<PageResult<R>>> + Send {
        let http = Arc::clone(&self.http);
        async move { http.fetch_page::<R>(&request).await }
    }
}

// ---------------------------------------------------------------------------
// State & events
// ---------------------------------------------------------------------------

/// Identity of an issued request. Later requests have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Loaded(Arc<PageResult<T>>),
    Errored(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// What [`Pager::next_event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerEvent {
    /// The latest request succeeded and its page is now visible.
    Committed(RequestId),
    /// The latest request failed; the table is errored.
    Failed(RequestId),
    /// A superseded request finished and was dropped.
    Discarded(RequestId),
    /// A debounced filter's quiet period elapsed and it was applied.
    FilterApplied(String),
}

#[derive(Debug, Clone)]
pub struct PagerConfig {
    pub page_size: u32,
    pub debounce: Duration,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

struct Completion<T> {
    id: RequestId,
    result: Result<PageResult<T>>,
}

struct PendingFilter {
    name: String,
    value: FilterValue,
    deadline: Instant,
}

enum Wake<T> {
    Completion(Completion<T>),
    DebounceElapsed,
}

// ---------------------------------------------------------------------------
// Pager
// ---------------------------------------------------------------------------

/// Query holder plus fetch orchestrator for a single table.
pub struct Pager<S: CollectionSource> {
    source: Arc<S>,
    query: QueryState,
    state: FetchState<S::Item>,
    /// Last successfully loaded page; kept visible while reloading and
    /// after a failure.
    last_loaded: Option<Arc<PageResult<S::Item>>>,
    /// 0-based collection position of the first row of `last_loaded`.
    loaded_offset: u64,
    next_id: u64,
    /// The newest issued request and the query it was issued for.
    in_flight: Option<(RequestId, PageQuery)>,
    pending_filter: Option<PendingFilter>,
    debounce: Duration,
    completions_tx: mpsc::UnboundedSender<Completion<S::Item>>,
    completions_rx: mpsc::UnboundedReceiver<Completion<S::Item>>,
}

impl<S: CollectionSource> Pager<S> {
    /// Create an idle pager. Nothing is fetched until [`refresh`](Self::refresh)
    /// or a mutator is called.
    pub fn new(source: Arc<S>, config: PagerConfig) -> Result<Self> {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Ok(Self {
            source,
            query: QueryState::new(config.page_size)?,
            state: FetchState::Idle,
            last_loaded: None,
            loaded_offset: 0,
            next_id: 1,
            in_flight: None,
            pending_filter: None,
            debounce: config.debounce,
            completions_tx,
            completions_rx,
        })
    }

    pub fn query(&self) -> &PageQuery {
        self.query.query()
    }

    pub fn state(&self) -> &FetchState<S::Item> {
        &self.state
    }

    pub fn last_loaded(&self) -> Option<&PageResult<S::Item>> {
        self.last_loaded.as_deref()
    }

    /// Rows to display: the last loaded page (stale while reloading).
    pub fn rows(&self) -> &[S::Item] {
        self.last_loaded
            .as_deref()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Total pages reported by the last load, if any load succeeded.
    pub fn total_pages(&self) -> Option<u32> {
        self.last_loaded.as_deref().map(|page| page.total_pages)
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Text currently waiting out its debounce window.
    pub fn pending_filter(&self) -> Option<(&str, &FilterValue)> {
        self.pending_filter
            .as_ref()
            .map(|p| (p.name.as_str(), &p.value))
    }

    // --- Fetching ---

    /// Fetch the current query unless a request for it is already in
    /// flight. Returns the id of a newly issued request.
    pub fn refresh(&mut self) -> Option<RequestId> {
        if let Some((id, query)) = &self.in_flight {
            if query == self.query.query() {
                debug!(request_id = id.0, "identical request already in flight");
                return None;
            }
        }
        Some(self.issue())
    }

    /// Fetch the current query even if it is already loaded or in flight.
    pub fn reload(&mut self) -> RequestId {
        self.issue()
    }

    fn issue(&mut self) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let query = self.query.query().clone();
        let request = PageRequest::from_query(&query);
        debug!(
            request_id = id.0,
            page_number = request.page_number.get(),
            page_size = request.page_size,
            sort_key = ?request.sort_key,
            filters = request.filters.len(),
            "issuing collection fetch"
        );

        self.state = FetchState::Loading;
        self.in_flight = Some((id, query));

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch(request).await;
            // The pager may be gone; its result is simply dropped.
            let _ = tx.send(Completion { id, result });
        });

        id
    }

    /// Wait for the next completion or debounce deadline and apply it.
    ///
    /// Pending forever when nothing is in flight and no filter is pending;
    /// meant to be one branch of the owner's `select!`.
    pub async fn next_event(&mut self) -> Option<PagerEvent> {
        let deadline = self.pending_filter.as_ref().map(|p| p.deadline);

        let wake = tokio::select! {
            Some(completion) = self.completions_rx.recv() => Wake::Completion(completion),
            _ = debounce_elapsed(deadline) => Wake::DebounceElapsed,
            else => return None,
        };

        match wake {
            Wake::Completion(completion) => Some(self.accept(completion)),
            Wake::DebounceElapsed => self.flush_pending_filter().map(PagerEvent::FilterApplied),
        }
    }

    fn accept(&mut self, completion: Completion<S::Item>) -> PagerEvent {
        let Completion { id, result } = completion;

        let query = match self.in_flight.take() {
            Some((latest, query)) if latest == id && &query == self.query.query() => query,
            other => {
                self.in_flight = other;
                debug!(request_id = id.0, "discarding superseded response");
                return PagerEvent::Discarded(id);
            }
        };

        match result {
            Ok(page) => {
                debug!(
                    request_id = id.0,
                    items = page.items.len(),
                    total_count = page.total_count,
                    total_pages = page.total_pages,
                    "page loaded"
                );
                let page = Arc::new(page);
                self.last_loaded = Some(Arc::clone(&page));
                self.loaded_offset =
                    u64::from(query.page_index.0) * u64::from(query.page_size);
                self.state = FetchState::Loaded(page);
                PagerEvent::Committed(id)
            }
            Err(e) => {
                warn!(request_id = id.0, kind = ?e.kind(), error = %e, "collection fetch failed");
                self.state = FetchState::Errored(e.reason());
                PagerEvent::Failed(id)
            }
        }
    }

    // --- Query mutators (each re-fetches when the query changed) ---

    /// Go to a 0-based page, clamped to the last known page.
    pub fn set_page(&mut self, index: PageIndex) -> bool {
        let index = match self.total_pages() {
            Some(total) => index.clamp_to(total),
            None => index,
        };
        self.changed(|q| q.set_page(index))
    }

    /// Go to a 1-based page as chosen by the user. Out-of-range numbers clamp.
    pub fn on_page_change(&mut self, number: u32) -> bool {
        let total = self.total_pages().unwrap_or(u32::MAX);
        self.changed(|q| q.go_to_page(number, total))
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<bool> {
        let changed = self.query.set_page_size(page_size)?;
        if changed {
            self.refresh();
        }
        Ok(changed)
    }

    pub fn set_sort(&mut self, key: impl Into<String>, descending: bool) -> bool {
        let key = key.into();
        self.changed(|q| q.set_sort(key, descending))
    }

    pub fn clear_sort(&mut self) -> bool {
        self.changed(QueryState::clear_sort)
    }

    /// Apply a filter immediately, superseding any pending typed value for
    /// the same name.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        let name = name.into();
        if self
            .pending_filter
            .as_ref()
            .is_some_and(|p| p.name == name)
        {
            self.pending_filter = None;
        }
        let value = value.into();
        self.changed(|q| q.set_filter(name, value))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.pending_filter = None;
        self.changed(QueryState::clear_filters)
    }

    /// Record a keystroke-driven filter value. It is applied once no further
    /// value has been typed for the debounce period.
    pub fn type_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        let name = name.into();
        let value = value.into();
        if self.debounce.is_zero() {
            self.set_filter(name, value);
            return;
        }
        if let Some(pending) = &self.pending_filter {
            if pending.name != name {
                // Typing moved to another field; settle the previous one now.
                self.flush_pending_filter();
            }
        }
        self.pending_filter = Some(PendingFilter {
            name,
            value,
            deadline: Instant::now() + self.debounce,
        });
    }

    /// Apply the pending typed filter without waiting. Returns its name.
    pub fn flush_pending_filter(&mut self) -> Option<String> {
        let PendingFilter { name, value, .. } = self.pending_filter.take()?;
        self.changed(|q| q.set_filter(name.clone(), value));
        Some(name)
    }

    /// Drop the pending typed filter without applying it. Returns whether
    /// one was pending.
    pub fn discard_pending_filter(&mut self) -> bool {
        let discarded = self.pending_filter.take();
        if let Some(pending) = &discarded {
            debug!(filter = %pending.name, "discarded pending filter");
        }
        discarded.is_some()
    }

    /// Apply an intent emitted by the view.
    pub fn apply(&mut self, intent: TableIntent) -> Result<bool> {
        Ok(match intent {
            TableIntent::PageChange(number) => self.on_page_change(number),
            TableIntent::PageSize(size) => self.set_page_size(size)?,
            TableIntent::SortBy { key, descending } => self.set_sort(key, descending),
            TableIntent::ClearSort => self.clear_sort(),
            TableIntent::Filter { name, value } => self.set_filter(name, value),
            TableIntent::ClearFilters => self.clear_filters(),
        })
    }

    fn changed(&mut self, mutate: impl FnOnce(&mut QueryState) -> bool) -> bool {
        let changed = mutate(&mut self.query);
        if changed {
            self.refresh();
        }
        changed
    }

    // --- View ---

    pub fn view_state(&self) -> ViewState {
        ViewState::from_fetch(&self.state, self.last_loaded.is_some())
    }

    /// Render contract for the current state.
    pub fn props<'a>(&'a self, columns: &'a [Column]) -> TableProps<'a, S::Item> {
        let query = self.query.query();
        let (total_count, total_pages) = self
            .last_loaded
            .as_deref()
            .map(|page| (page.total_count, page.total_pages))
            .unwrap_or((0, 0));

        TableProps {
            columns,
            data: self.rows(),
            data_offset: self.loaded_offset,
            total_count,
            current_page: query.page_index.to_number(),
            page_size: query.page_size,
            total_pages,
            loading: self.is_loading(),
            state: self.view_state(),
            sort_key: query.sort_key.as_deref(),
            sort_descending: query.sort_descending,
        }
    }
}

async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use super::*;
    use crate::error::ConsignError;
    use crate::types::total_pages_for;

    /// Serves pages of `0..total` and records every request.
    struct VecSource {
        total: u32,
        requests: Mutex<Vec<PageRequest>>,
        fail: Mutex<bool>,
    }

    impl VecSource {
        fn new(total: u32) -> Arc<Self> {
            Arc::new(Self {
                total,
                requests: Mutex::new(Vec::new()),
                fail: Mutex::new(false),
            })
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl CollectionSource for VecSource {
        type Item = u32;

        fn fetch(
            &self,
            request: PageRequest,
        ) -> impl Future<Output = Result<PageResult<u32>>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let fail = *self.fail.lock().unwrap();
            let total = self.total;
            async move {
                if fail {
                    return Err(ConsignError::Http {
                        status: 503,
                        message: "maintenance".into(),
                    });
                }
                let start = request.page_number.to_index().0 * request.page_size;
                let end = (start + request.page_size).min(total);
                Ok(PageResult {
                    items: (start..end).map(|i| i + 1).collect(),
                    total_count: u64::from(total),
                    total_pages: total_pages_for(u64::from(total), request.page_size),
                })
            }
        }
    }

    /// Holds every response until the test releases it.
    struct GatedSource {
        gates: Mutex<Vec<(PageRequest, oneshot::Sender<Result<PageResult<u32>>>)>>,
    }

    impl GatedSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                gates: Mutex::new(Vec::new()),
            })
        }

        fn release(&self, index: usize, items: Vec<u32>) {
            let (_, tx) = self.gates.lock().unwrap().remove(index);
            let total = items.len() as u64;
            let _ = tx.send(Ok(PageResult {
                items,
                total_count: total,
                total_pages: 1,
            }));
        }

        fn fail(&self, index: usize) {
            let (_, tx) = self.gates.lock().unwrap().remove(index);
            let _ = tx.send(Err(ConsignError::Mapping("bad shape".into())));
        }

        fn waiting(&self) -> usize {
            self.gates.lock().unwrap().len()
        }
    }

    impl CollectionSource for GatedSource {
        type Item = u32;

        fn fetch(
            &self,
            request: PageRequest,
        ) -> impl Future<Output = Result<PageResult<u32>>> + Send {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push((request, tx));
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(ConsignError::Validation("gate dropped".into())))
            }
        }
    }

    fn config() -> PagerConfig {
        PagerConfig {
            page_size: 10,
            debounce: Duration::from_millis(300),
        }
    }

    /// Let spawned fetch tasks run up to their first await.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn starts_idle_and_loads() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        assert!(matches!(pager.state(), FetchState::Idle));
        assert_eq!(pager.view_state(), ViewState::Empty);

        let id = pager.refresh().unwrap();
        assert!(pager.is_loading());
        assert_eq!(pager.view_state(), ViewState::Loading { stale: false });

        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(id)));
        assert_eq!(pager.total_pages(), Some(3));
        assert_eq!(pager.rows(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn page_change_sends_one_based_number() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;

        assert!(pager.on_page_change(2));
        let id = pager.in_flight().unwrap();
        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(id)));

        let requests = source.requests();
        assert_eq!(requests.last().unwrap().page_number.get(), 2);
        assert_eq!(pager.query().page_index, PageIndex(1));
        let expected: Vec<u32> = (11..=20).collect();
        assert_eq!(pager.rows(), expected.as_slice());

        let props = pager.props(&[]);
        assert_eq!(props.current_page.get(), 2);
        assert_eq!(props.total_pages, 3);
        assert_eq!(props.row_range(), Some((11, 20)));
    }

    #[tokio::test]
    async fn page_change_clamps_to_known_range() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;

        assert!(pager.on_page_change(99));
        assert_eq!(pager.query().page_index, PageIndex(2));
        pager.next_event().await;

        assert!(pager.on_page_change(0));
        assert_eq!(pager.query().page_index, PageIndex(0));
        pager.next_event().await;

        assert!(!pager.set_page(PageIndex(0)));
        assert!(pager.set_page(PageIndex(50)));
        assert_eq!(pager.query().page_index, PageIndex(2));
    }

    #[tokio::test]
    async fn unchanged_filter_does_not_refetch() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        assert!(pager.set_filter("status", "PENDING"));
        pager.next_event().await;
        assert!(!pager.set_filter("status", "PENDING"));
        settle().await;
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn refresh_deduplicates_in_flight_query() {
        let source = GatedSource::new();
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        assert!(pager.refresh().is_some());
        assert!(pager.refresh().is_none());
        settle().await;
        assert_eq!(source.waiting(), 1);

        // reload always issues.
        pager.reload();
        settle().await;
        assert_eq!(source.waiting(), 2);
    }

    #[tokio::test]
    async fn last_query_wins_when_older_response_arrives_late() {
        let source = GatedSource::new();
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.set_filter("keyword", "a");
        let first = pager.in_flight().unwrap();
        pager.set_filter("keyword", "ab");
        let second = pager.in_flight().unwrap();
        assert!(second > first);
        settle().await;
        assert_eq!(source.waiting(), 2);

        // Newer response first.
        source.release(1, vec![42]);
        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(second)));

        // Older response straggles in and must not overwrite.
        source.release(0, vec![7, 8, 9]);
        assert_eq!(pager.next_event().await, Some(PagerEvent::Discarded(first)));

        assert_eq!(pager.rows(), &[42]);
        assert!(matches!(pager.state(), FetchState::Loaded(_)));
    }

    #[tokio::test]
    async fn older_response_arriving_first_is_discarded() {
        let source = GatedSource::new();
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.set_sort("amount", true);
        let first = pager.in_flight().unwrap();
        pager.set_sort("amount", false);
        let second = pager.in_flight().unwrap();
        settle().await;

        source.release(0, vec![1]);
        assert_eq!(pager.next_event().await, Some(PagerEvent::Discarded(first)));
        assert!(pager.is_loading());

        source.release(0, vec![2]);
        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(second)));
        assert_eq!(pager.rows(), &[2]);
    }

    #[tokio::test]
    async fn stale_failure_is_discarded_too() {
        let source = GatedSource::new();
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.set_filter("status", "PENDING");
        pager.set_filter("status", "PAID");
        let second = pager.in_flight().unwrap();
        settle().await;

        source.release(1, vec![5]);
        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(second)));
        source.fail(0);
        assert!(matches!(
            pager.next_event().await,
            Some(PagerEvent::Discarded(_))
        ));
        assert!(matches!(pager.state(), FetchState::Loaded(_)));
    }

    #[tokio::test]
    async fn failure_after_load_keeps_rows_frozen() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;
        let before = pager.rows().to_vec();

        source.set_failing(true);
        pager.on_page_change(2);
        assert_eq!(pager.view_state(), ViewState::Loading { stale: true });
        let id = pager.in_flight().unwrap();
        assert_eq!(pager.next_event().await, Some(PagerEvent::Failed(id)));

        match pager.state() {
            FetchState::Errored(reason) => assert!(reason.contains("maintenance")),
            other => panic!("expected errored state, got {other:?}"),
        }
        assert_eq!(pager.rows(), before.as_slice());
        let props = pager.props(&[]);
        assert!(props.error().is_some());
        assert!(!props.loading);
    }

    #[tokio::test]
    async fn frozen_rows_keep_their_own_range() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;

        source.set_failing(true);
        pager.on_page_change(2);
        assert_eq!(pager.props(&[]).row_range(), Some((1, 10)));
        pager.next_event().await;

        let props = pager.props(&[]);
        assert_eq!(pager.rows(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(props.current_page.get(), 2);
        assert_eq!(props.row_range(), Some((1, 10)));

        source.set_failing(false);
        pager.reload();
        pager.next_event().await;
        assert_eq!(pager.props(&[]).row_range(), Some((11, 20)));
    }

    #[tokio::test]
    async fn errored_recovers_on_query_change() {
        let source = VecSource::new(25);
        source.set_failing(true);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;
        assert!(matches!(pager.view_state(), ViewState::Errored(_)));

        source.set_failing(false);
        pager.set_filter("keyword", "lamp");
        assert_eq!(pager.view_state(), ViewState::Loading { stale: false });
        pager.next_event().await;
        assert_eq!(pager.view_state(), ViewState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_typing_fires_once() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.type_filter("keyword", "a");
        tokio::time::advance(Duration::from_millis(100)).await;
        pager.type_filter("keyword", "ab");
        assert_eq!(pager.pending_filter().map(|(n, _)| n), Some("keyword"));
        settle().await;
        assert!(source.requests().is_empty());

        let started = Instant::now();
        assert_eq!(
            pager.next_event().await,
            Some(PagerEvent::FilterApplied("keyword".into()))
        );
        assert!(started.elapsed() >= Duration::from_millis(300));

        let id = pager.in_flight().unwrap();
        assert_eq!(pager.next_event().await, Some(PagerEvent::Committed(id)));

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].filters,
            vec![("keyword".to_string(), "ab".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_filter_cancels_pending_typing() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.type_filter("keyword", "la");
        pager.set_filter("keyword", "lamp");
        assert!(pager.pending_filter().is_none());
        pager.next_event().await;

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].filters[0].1, "lamp");
    }

    #[tokio::test(start_paused = true)]
    async fn discarded_typing_never_fetches() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();

        pager.type_filter("keyword", "lam");
        assert!(pager.discard_pending_filter());
        assert!(!pager.discard_pending_filter());
        assert!(pager.query().filters.is_empty());

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert!(source.requests().is_empty());
        assert!(matches!(pager.state(), FetchState::Idle));
    }

    #[tokio::test]
    async fn filter_resets_page_through_pager() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        pager.refresh();
        pager.next_event().await;
        pager.on_page_change(3);
        pager.next_event().await;

        pager
            .apply(TableIntent::Filter {
                name: "status".into(),
                value: "PAID".into(),
            })
            .unwrap();
        assert_eq!(pager.query().page_index, PageIndex(0));
        pager.next_event().await;
        assert_eq!(source.requests().last().unwrap().page_number.get(), 1);
    }

    #[tokio::test]
    async fn page_size_zero_is_rejected() {
        let source = VecSource::new(25);
        let mut pager = Pager::new(Arc::clone(&source), config()).unwrap();
        assert!(pager.apply(TableIntent::PageSize(0)).is_err());
        assert!(pager.in_flight().is_none());
    }
}
