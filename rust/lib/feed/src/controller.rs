//! FeedController — wires a [`FeedLoader`] to a page source and a
//! visibility signal.
//!
//! - One subscription on the signal at a time. It is re-created whenever
//!   `(has_next_page, is_fetching_next_page)` changes, and the old one is
//!   always removed first.
//! - A visible signal calls `trigger`. The loader's check-and-set runs
//!   under one lock before the fetch is spawned, so overlapping signals
//!   cannot start a second fetch on any runtime flavor.
//! - Every re-observation looks at the sentinel's current visibility:
//!   after a page lands, a sentinel that is still on screen pulls the next
//!   page straight away. Failed fetches are not retried until the next
//!   visible signal.
//! - State snapshots are published on a `watch` channel while the loader
//!   lock is held, so the channel always ends on the newest state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::loader::{FeedLoader, FeedLoaderState, FetchTicket, LoaderPhase};
use crate::page::{FeedEntry, FeedPage};
use crate::signal::{SubscriptionId, VisibilityHandler, VisibilitySignal};
use crate::source::PageSource;

/// The live subscription and the state it was created for.
struct Observation {
    id: SubscriptionId,
    state: FeedLoaderState,
}

struct Inner<T, S> {
    loader: Mutex<FeedLoader<T>>,
    source: S,
    signal: Arc<dyn VisibilitySignal>,
    observer: Mutex<Option<Observation>>,
    state_tx: watch::Sender<FeedLoaderState>,
    runtime: Handle,
}

/// Infinite-scroll driver for one feed.
///
/// Dropping the controller tears it down.
pub struct FeedController<T, S>
where
    T: Send + 'static,
    S: PageSource<T> + 'static,
{
    inner: Arc<Inner<T, S>>,
}

impl<T, S> FeedController<T, S>
where
    T: Send + 'static,
    S: PageSource<T> + 'static,
{
    /// Create a controller on the current tokio runtime and start observing.
    ///
    /// If the sentinel is already visible the first page is requested
    /// immediately.
    pub fn new(source: S, signal: Arc<dyn VisibilitySignal>) -> Result<Self, FeedError> {
        let runtime = Handle::try_current().map_err(|e| FeedError::Runtime(e.to_string()))?;
        Ok(Self::with_runtime(source, signal, runtime))
    }

    /// Create a controller that spawns fetches on `runtime`.
    pub fn with_runtime(source: S, signal: Arc<dyn VisibilitySignal>, runtime: Handle) -> Self {
        let loader = FeedLoader::new();
        let (state_tx, _) = watch::channel(loader.state());
        let inner = Arc::new(Inner {
            loader: Mutex::new(loader),
            source,
            signal,
            observer: Mutex::new(None),
            state_tx,
            runtime,
        });
        Inner::observe(&inner);
        if inner.signal.is_visible() {
            Inner::trigger(&inner);
        }
        Self { inner }
    }

    // ====================================================================
    // Commands
    // ====================================================================

    /// Request the next page if the loader allows it.
    ///
    /// Returns `true` if a fetch was started.
    pub fn trigger(&self) -> bool {
        Inner::trigger(&self.inner)
    }

    /// Drop all loaded entries, e.g. when the feed's filter changes.
    pub fn reset(&self) {
        {
            let mut loader = self.inner.lock_loader();
            if loader.is_disposed() {
                return;
            }
            loader.reset();
            self.inner.publish(&loader);
        }
        debug!("feed reset");
        Inner::observe(&self.inner);
        if self.inner.signal.is_visible() {
            Inner::trigger(&self.inner);
        }
    }

    /// Stop observing and dispose the loader. Safe to call repeatedly.
    pub fn teardown(&self) {
        let first = {
            let mut loader = self.inner.lock_loader();
            let first = !loader.is_disposed();
            loader.teardown();
            if first {
                self.inner.publish(&loader);
            }
            first
        };
        self.inner.disconnect();
        if first {
            info!("feed controller torn down");
        }
    }

    /// Update one loaded entry in place. Returns `false` if it is not loaded.
    pub fn update_entry<F>(&self, id: &str, f: F) -> bool
    where
        T: FeedEntry,
        F: FnOnce(&mut T),
    {
        self.inner.lock_loader().update_entry(id, f)
    }

    // ====================================================================
    // Queries
    // ====================================================================

    pub fn state(&self) -> FeedLoaderState {
        self.inner.lock_loader().state()
    }

    pub fn phase(&self) -> LoaderPhase {
        self.inner.lock_loader().phase()
    }

    pub fn last_error(&self) -> Option<FeedError> {
        self.inner.lock_loader().last_error().cloned()
    }

    /// Snapshot of every loaded entry.
    pub fn entries(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock_loader().entries().to_vec()
    }

    /// Snapshot of the loaded entries minus replies.
    pub fn visible_entries(&self) -> Vec<T>
    where
        T: FeedEntry + Clone,
    {
        self.inner.lock_loader().visible_entries().cloned().collect()
    }

    /// Read the loader under its lock.
    pub fn with_loader<R>(&self, f: impl FnOnce(&FeedLoader<T>) -> R) -> R {
        f(&self.inner.lock_loader())
    }

    /// Receive every published state change.
    pub fn watch(&self) -> watch::Receiver<FeedLoaderState> {
        self.inner.state_tx.subscribe()
    }

    /// Wait until no fetch is in flight.
    ///
    /// Returns immediately when idle. Fetches chained by a still-visible
    /// sentinel count as one continuous fetch.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.state_tx.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = rx.wait_for(|s| !s.is_fetching_next_page).await;
    }
}

impl<T, S> Drop for FeedController<T, S>
where
    T: Send + 'static,
    S: PageSource<T> + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<T, S> Inner<T, S>
where
    T: Send + 'static,
    S: PageSource<T> + 'static,
{
    fn lock_loader(&self) -> MutexGuard<'_, FeedLoader<T>> {
        self.loader.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_observer(&self) -> MutexGuard<'_, Option<Observation>> {
        self.observer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send the loader's state to watchers. Callers hold the loader lock.
    fn publish(&self, loader: &FeedLoader<T>) {
        self.state_tx.send_replace(loader.state());
    }

    fn trigger(inner: &Arc<Self>) -> bool {
        let ticket = {
            let mut loader = inner.lock_loader();
            let Some(ticket) = loader.trigger() else {
                return false;
            };
            inner.publish(&loader);
            ticket
        };
        Inner::observe(inner);
        Inner::spawn_fetch(inner, ticket);
        true
    }

    fn spawn_fetch(inner: &Arc<Self>, ticket: FetchTicket) {
        let task = Arc::clone(inner);
        inner.runtime.spawn(async move {
            let cursor = ticket.cursor().map(str::to_string);
            let result = task.source.fetch_page(cursor).await;
            Inner::settle(&task, &ticket, result);
        });
    }

    /// Apply a fetch result. A still-visible sentinel immediately starts
    /// the next fetch under the same lock, so watchers never see an idle
    /// gap between chained pages.
    fn settle(inner: &Arc<Self>, ticket: &FetchTicket, result: Result<FeedPage<T>, FeedError>) {
        let next = {
            let mut loader = inner.lock_loader();
            let loaded = match result {
                Ok(page) => {
                    if !loader.on_page_loaded(ticket, page) {
                        return;
                    }
                    true
                }
                Err(e) => {
                    if !loader.on_fetch_failed(ticket, e.clone()) {
                        return;
                    }
                    warn!(error = %e, "feed fetch failed");
                    false
                }
            };
            let next = if loaded && inner.signal.is_visible() {
                loader.trigger()
            } else {
                None
            };
            inner.publish(&loader);
            next
        };
        Inner::observe(inner);
        if let Some(ticket) = next {
            Inner::spawn_fetch(inner, ticket);
        }
    }

    /// Make sure exactly one subscription exists for the current state.
    fn observe(inner: &Arc<Self>) {
        let (state, disposed) = {
            let loader = inner.lock_loader();
            (loader.state(), loader.is_disposed())
        };
        if disposed {
            inner.disconnect();
            return;
        }

        let mut observer = inner.lock_observer();
        if observer.as_ref().is_some_and(|obs| obs.state == state) {
            return;
        }
        if let Some(old) = observer.take() {
            inner.signal.unsubscribe(old.id);
        }

        let weak = Arc::downgrade(inner);
        let handler: VisibilityHandler = Arc::new(move |is_intersecting: bool| {
            if !is_intersecting {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                Inner::trigger(&inner);
            }
        });
        let id = inner.signal.subscribe(handler);
        debug!(?id, ?state, "feed observer attached");
        *observer = Some(Observation { id, state });
    }

    fn disconnect(&self) {
        if let Some(old) = self.lock_observer().take() {
            self.signal.unsubscribe(old.id);
            debug!(id = ?old.id, "feed observer detached");
        }
    }
}
