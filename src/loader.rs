//! Incremental, scroll-triggered data loader.
//!
//! This component drives infinite-scroll semantics: it appends pages of
//! items fetched through a [`Fetcher`], keeps at most one fetch in
//! flight, and detects end-of-data from a short batch; it never asks
//! the backend for a total count.
//!
//! The loader moves between three phases:
//!
//! ```text
//! Idle → Loading → (Idle | Exhausted)
//! ```
//!
//! A fetch failure is an excursion: the error is reported through the
//! injected [`Notifier`] and the loader returns to Idle, so the next
//! scroll trigger retries the same window. Exhausted is only ever
//! reached by a successful short batch.
//!
//! Fetches run as bubbletea-rs commands. Each command resolves to a
//! [`BatchMsg`] (or [`BatchErrMsg`]) stamped with the loader's instance
//! id and its reset generation; messages whose stamp no longer matches
//! are discarded, so a fetch resolving after the filters changed cannot
//! corrupt the fresh state.
//!
//! # Examples
//!
//! ```rust,no_run
//! use datatable_widgets::loader::{Batch, FetchError, FetchRequest, Fetcher, Model};
//! use async_trait::async_trait;
//!
//! struct Backend;
//!
//! #[async_trait]
//! impl Fetcher<String> for Backend {
//!     async fn fetch(&self, request: FetchRequest) -> Result<Batch<String>, FetchError> {
//!         // Issue a request for rows [request.skip, request.skip + request.take).
//!         Ok(Batch::new(vec![]))
//!     }
//! }
//!
//! let mut loader: Model<String> = Model::new(Backend).with_per_page(20);
//! if let Some(cmd) = loader.load_more() {
//!     // Hand cmd to the bubbletea-rs runtime; the resulting message
//!     // comes back through loader.update().
//! }
//! ```

use crate::state::FilterState;
use async_trait::async_trait;
use bubbletea_rs::{Cmd, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use thiserror::Error;

// Internal ID management for loader instances, used to route batch
// messages when several loaders share one program.
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Scroll distance from the bottom, in rows, below which the next page
/// is requested.
pub const DEFAULT_THRESHOLD: usize = 50;

const DEFAULT_PER_PAGE: usize = 20;

/// Error produced by a [`Fetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request itself failed (transport, timeout, server error).
    #[error("fetch request failed: {0}")]
    Request(String),
    /// The response arrived but could not be decoded into items.
    #[error("fetch response invalid: {0}")]
    Decode(String),
}

/// One fetched page of items.
#[derive(Debug, Clone)]
pub struct Batch<T> {
    /// The items, in backend order.
    pub items: Vec<T>,
    /// Total row count, when the backend reports one. The loader never
    /// uses it; it exists for hosts that also drive a manual paginator
    /// from the same endpoint.
    pub count: Option<usize>,
}

impl<T> Batch<T> {
    /// A batch with no reported total.
    pub fn new(items: Vec<T>) -> Self {
        Self { items, count: None }
    }

    /// Attaches a backend-reported total (builder pattern).
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Parameters for one fetch: the window and the active filters.
///
/// Implementations of [`Fetcher`] own the mapping from this shape to
/// whatever their backend expects.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Zero-based row offset.
    pub skip: usize,
    /// Rows requested.
    pub take: usize,
    /// Filters active when the request was issued.
    pub filters: FilterState,
}

/// The data-fetch contract the integrator implements.
#[async_trait]
pub trait Fetcher<T>: Send + Sync {
    /// Fetches one page of items.
    async fn fetch(&self, request: FetchRequest) -> Result<Batch<T>, FetchError>;
}

/// Sink for loader failure reports.
///
/// Injected rather than global so hosts control routing and tests can
/// capture reports.
pub trait Notifier: Send + Sync {
    /// Reports a fetch failure.
    fn error(&self, message: &str);
}

/// Default [`Notifier`] that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Loader phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch in flight; more data may exist.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// A short batch arrived; there is no more data.
    Exhausted,
}

/// Message delivered when a fetch succeeds.
#[derive(Debug)]
pub struct BatchMsg<T> {
    /// Instance id of the loader the batch belongs to.
    pub id: i64,
    /// Reset generation the fetch was issued under.
    pub generation: u64,
    /// The fetched items.
    pub items: Vec<T>,
}

/// Message delivered when a fetch fails.
#[derive(Debug)]
pub struct BatchErrMsg {
    /// Instance id of the loader the failure belongs to.
    pub id: i64,
    /// Reset generation the fetch was issued under.
    pub generation: u64,
    /// The failure.
    pub error: FetchError,
}

/// Incremental loader model.
///
/// Items grow monotonically by append while the filter identity stays
/// the same; changing filters (or an explicit [`refetch`](Self::refetch))
/// resets to an empty list. Because [`load_more`](Self::load_more) is a
/// no-op outside Idle, at most one fetch is in flight and appended
/// batches are strictly ordered by their skip.
pub struct Model<T> {
    id: i64,
    generation: u64,
    phase: Phase,
    items: Vec<T>,
    skip: usize,
    per_page: usize,
    threshold: usize,
    filters: FilterState,
    fetcher: Arc<dyn Fetcher<T>>,
    notifier: Arc<dyn Notifier>,
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("phase", &self.phase)
            .field("items", &self.items.len())
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Model<T> {
    /// Creates a loader over a fetcher.
    pub fn new(fetcher: impl Fetcher<T> + 'static) -> Self {
        Self {
            id: next_id(),
            generation: 0,
            phase: Phase::Idle,
            items: Vec::new(),
            skip: 0,
            per_page: DEFAULT_PER_PAGE,
            threshold: DEFAULT_THRESHOLD,
            filters: FilterState::new(),
            fetcher: Arc::new(fetcher),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Sets the batch size, clamped to a minimum of 1 (builder
    /// pattern).
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Sets the scroll threshold in rows (builder pattern).
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replaces the failure sink (builder pattern).
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// This loader's instance id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The items loaded so far, in fetch order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// False once a short batch signalled end-of-data.
    pub fn has_more(&self) -> bool {
        self.phase != Phase::Exhausted
    }

    /// The offset the next fetch will request.
    pub fn next_skip(&self) -> usize {
        self.skip
    }

    /// The filters stamped onto outgoing requests.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replaces the filter identity. A changed identity discards all
    /// loaded items and starts over from offset 0; an unchanged one is
    /// a no-op.
    pub fn set_filters(&mut self, filters: FilterState) {
        if self.filters != filters {
            self.filters = filters;
            self.reset();
        }
    }

    /// Explicit refetch trigger: discards loaded items and starts over
    /// from offset 0.
    pub fn refetch(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.items.clear();
        self.skip = 0;
        self.phase = Phase::Idle;
        // In-flight responses for the old generation are discarded on
        // arrival.
        self.generation += 1;
    }

    /// Requests the next page. Returns `None` while a fetch is in
    /// flight or after end-of-data; otherwise enters Loading and
    /// returns the fetch command.
    pub fn load_more(&mut self) -> Option<Cmd> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.phase = Phase::Loading;

        let fetcher = Arc::clone(&self.fetcher);
        let request = FetchRequest {
            skip: self.skip,
            take: self.per_page,
            filters: self.filters.clone(),
        };
        let id = self.id;
        let generation = self.generation;
        Some(Box::pin(async move {
            let msg: Msg = match fetcher.fetch(request).await {
                Ok(batch) => Box::new(BatchMsg {
                    id,
                    generation,
                    items: batch.items,
                }),
                Err(error) => Box::new(BatchErrMsg {
                    id,
                    generation,
                    error,
                }),
            };
            Some(msg)
        }))
    }

    /// True when the scroll position is within the threshold of the
    /// bottom and the loader is neither Loading nor Exhausted.
    pub fn should_load_more(&self, metrics: &ScrollMetrics) -> bool {
        self.phase == Phase::Idle && metrics.remaining() < self.threshold
    }

    /// Scroll-driven trigger: calls [`load_more`](Self::load_more) when
    /// [`should_load_more`](Self::should_load_more) holds.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> Option<Cmd> {
        if self.should_load_more(metrics) {
            self.load_more()
        } else {
            None
        }
    }

    /// Processes batch and failure messages.
    ///
    /// Messages stamped with another loader's id or a superseded
    /// generation are discarded without touching state. A successful
    /// batch appends its items and advances the offset; a batch shorter
    /// than the page size is the end-of-data signal. A failure is
    /// reported to the notifier and returns the loader to Idle,
    /// leaving the offset where it was so the same window is retried
    /// next time.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let msg = match msg.downcast::<BatchMsg<T>>() {
            Ok(batch) => {
                self.apply_batch(*batch);
                return None;
            }
            Err(msg) => msg,
        };
        if let Some(err) = msg.downcast_ref::<BatchErrMsg>() {
            if err.id == self.id && err.generation == self.generation {
                self.notifier.error(&format!(
                    "failed to load rows at offset {}: {}",
                    self.skip, err.error
                ));
                if self.phase == Phase::Loading {
                    self.phase = Phase::Idle;
                }
            }
        }
        None
    }

    fn apply_batch(&mut self, batch: BatchMsg<T>) {
        if batch.id != self.id || batch.generation != self.generation {
            return;
        }
        if self.phase != Phase::Loading {
            return;
        }
        let short = batch.items.len() < self.per_page;
        self.items.extend(batch.items);
        self.skip += self.per_page;
        self.phase = if short { Phase::Exhausted } else { Phase::Idle };
    }
}

/// Scroll geometry of the host's scrollable area, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Total content height.
    pub content_height: usize,
    /// Scroll offset of the top visible row.
    pub offset: usize,
    /// Height of the visible area.
    pub viewport_height: usize,
}

impl ScrollMetrics {
    /// Rows between the bottom of the visible area and the end of the
    /// content.
    pub fn remaining(&self) -> usize {
        self.content_height
            .saturating_sub(self.offset + self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct ScriptedFetcher {
        batches: Mutex<VecDeque<Result<Batch<usize>, FetchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(batches: Vec<Result<Batch<usize>, FetchError>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Fetcher<usize> for Arc<ScriptedFetcher> {
        async fn fetch(&self, _request: FetchRequest) -> Result<Batch<usize>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Batch::new(vec![])))
        }
    }

    #[derive(Default)]
    struct CapturingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for Arc<CapturingNotifier> {
        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn batch_of(len: usize) -> Result<Batch<usize>, FetchError> {
        Ok(Batch::new((0..len).collect()))
    }

    async fn run_round(loader: &mut Model<usize>) {
        let cmd = loader.load_more().expect("loader should accept load_more");
        let msg = cmd.await.expect("fetch command always yields a message");
        loader.update(msg);
    }

    #[tokio::test]
    async fn test_full_batches_keep_loading() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![batch_of(20), batch_of(20)]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);

        run_round(&mut loader).await;
        assert_eq!(loader.items().len(), 20);
        assert_eq!(loader.next_skip(), 20);
        assert!(loader.has_more());
        assert_eq!(loader.phase(), Phase::Idle);

        run_round(&mut loader).await;
        assert_eq!(loader.items().len(), 40);
        assert_eq!(loader.next_skip(), 40);
    }

    #[tokio::test]
    async fn test_short_batch_exhausts() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            batch_of(20),
            batch_of(20),
            batch_of(7),
        ]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);

        run_round(&mut loader).await;
        run_round(&mut loader).await;
        run_round(&mut loader).await;

        assert_eq!(loader.items().len(), 47);
        assert!(!loader.has_more());
        assert_eq!(loader.phase(), Phase::Exhausted);

        // Exhausted loaders refuse further loads.
        assert!(loader.load_more().is_none());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_at_most_one_fetch_in_flight() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![batch_of(20)]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);

        let first = loader.load_more();
        assert!(first.is_some());
        assert!(loader.is_loading());
        // A second call while the first is pending is dropped, not
        // queued.
        assert!(loader.load_more().is_none());

        let msg = first.unwrap().await.unwrap();
        loader.update(msg);
        assert_eq!(loader.items().len(), 20);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_logs_and_returns_to_idle() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            Err(FetchError::Request("boom".to_string())),
            batch_of(5),
        ]));
        let notifier = Arc::new(CapturingNotifier::default());
        let mut loader = Model::new(Arc::clone(&fetcher))
            .with_per_page(20)
            .with_notifier(Arc::clone(&notifier));

        run_round(&mut loader).await;
        assert_eq!(loader.phase(), Phase::Idle);
        assert!(loader.items().is_empty());
        // The failed window was not advanced past.
        assert_eq!(loader.next_skip(), 0);
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);

        // The loader stays retryable; the retry hits the same window.
        run_round(&mut loader).await;
        assert_eq!(loader.items().len(), 5);
    }

    #[tokio::test]
    async fn test_filter_change_resets_and_discards_stale_batch() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![batch_of(20), batch_of(3)]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);

        let in_flight = loader.load_more().unwrap();

        let mut filters = FilterState::new();
        filters.set("name", "widget");
        loader.set_filters(filters.clone());

        // The stale batch resolves after the reset and is discarded.
        let msg = in_flight.await.unwrap();
        loader.update(msg);
        assert!(loader.items().is_empty());
        assert_eq!(loader.phase(), Phase::Idle);
        assert_eq!(loader.next_skip(), 0);

        // The fresh generation loads normally.
        run_round(&mut loader).await;
        assert_eq!(loader.items().len(), 3);
        assert!(!loader.has_more());
    }

    #[tokio::test]
    async fn test_unchanged_filters_do_not_reset() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![batch_of(20)]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);
        run_round(&mut loader).await;

        loader.set_filters(FilterState::new());
        assert_eq!(loader.items().len(), 20);
        assert_eq!(loader.next_skip(), 20);
    }

    #[test]
    fn test_scroll_threshold_trigger() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);

        let far = ScrollMetrics {
            content_height: 500,
            offset: 0,
            viewport_height: 40,
        };
        assert!(!loader.should_load_more(&far));
        assert!(loader.on_scroll(&far).is_none());

        let near = ScrollMetrics {
            content_height: 500,
            offset: 420,
            viewport_height: 40,
        };
        assert!(loader.should_load_more(&near));
        assert!(loader.on_scroll(&near).is_some());
        // Now Loading: the same scroll position does not double-fire.
        assert!(!loader.should_load_more(&near));
    }

    #[test]
    fn test_refetch_resets() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![]));
        let mut loader = Model::new(Arc::clone(&fetcher)).with_per_page(20);
        loader.refetch();
        assert!(loader.items().is_empty());
        assert_eq!(loader.next_skip(), 0);
        assert!(loader.has_more());
    }
}
