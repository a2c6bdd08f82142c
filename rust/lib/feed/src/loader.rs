//! FeedLoader — the synchronous state machine behind infinite scrolling.
//!
//! ```text
//! Idle --trigger (has_next_page)--> Fetching --page settles--> Idle
//! Idle --last page loaded-------------------------------------> Exhausted
//! any  --teardown---------------------------------------------> Disposed
//! ```
//!
//! `trigger` sets `is_fetching_next_page` before any fetch work starts and
//! hands back a [`FetchTicket`]. Only the settlement carrying the current
//! ticket is applied, so at most one fetch is ever in flight and a page
//! requested before `reset` never lands in the new feed.

use serde::Serialize;
use tracing::debug;

use crate::error::FeedError;
use crate::page::{FeedEntry, FeedPage};

/// The flags a view renders from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedLoaderState {
    pub has_next_page: bool,
    pub is_fetching_next_page: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderPhase {
    Idle,
    Fetching,
    /// The last page has been loaded. Terminal until `reset`.
    Exhausted,
    /// Torn down. Terminal.
    Disposed,
}

/// Permission to run one fetch, issued by [`FeedLoader::trigger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    cursor: Option<String>,
}

impl FetchTicket {
    /// Cursor to request; `None` for the first page.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct FeedLoader<T> {
    entries: Vec<T>,
    cursor: Option<String>,
    has_next_page: bool,
    in_flight: Option<FetchTicket>,
    /// Bumped by `reset`; tickets from older generations are stale.
    generation: u64,
    disposed: bool,
    pages_loaded: usize,
    last_error: Option<FeedError>,
}

impl<T> FeedLoader<T> {
    /// A fresh loader: nothing loaded, first page available.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            has_next_page: true,
            in_flight: None,
            generation: 0,
            disposed: false,
            pages_loaded: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> FeedLoaderState {
        FeedLoaderState {
            has_next_page: self.has_next_page,
            is_fetching_next_page: self.in_flight.is_some(),
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        if self.disposed {
            LoaderPhase::Disposed
        } else if self.in_flight.is_some() {
            LoaderPhase::Fetching
        } else if !self.has_next_page {
            LoaderPhase::Exhausted
        } else {
            LoaderPhase::Idle
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ====================================================================
    // Transitions
    // ====================================================================

    /// Handle a visibility signal from the feed's sentinel.
    ///
    /// Only an intersecting signal can start a fetch.
    pub fn on_visibility(&mut self, is_intersecting: bool) -> Option<FetchTicket> {
        if !is_intersecting {
            return None;
        }
        self.trigger()
    }

    /// Begin fetching the next page if allowed.
    ///
    /// Returns `None` when disposed, exhausted, or a fetch is already in
    /// flight. Otherwise marks the loader as fetching and returns the ticket
    /// the settlement must present.
    pub fn trigger(&mut self) -> Option<FetchTicket> {
        match self.phase() {
            LoaderPhase::Idle => {}
            phase => {
                debug!(?phase, "feed trigger ignored");
                return None;
            }
        }
        let ticket = FetchTicket {
            generation: self.generation,
            cursor: self.cursor.clone(),
        };
        debug!(cursor = ?ticket.cursor, "feed fetch started");
        self.in_flight = Some(ticket.clone());
        Some(ticket)
    }

    /// Apply a loaded page.
    ///
    /// Returns `false` (and changes nothing) if the ticket is stale or the
    /// loader is disposed.
    pub fn on_page_loaded(&mut self, ticket: &FetchTicket, page: FeedPage<T>) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "discarding stale page");
            return false;
        }
        let FeedPage { data, next } = page;
        debug!(entries = data.len(), has_next = next.is_some(), "feed page loaded");
        self.entries.extend(data);
        self.has_next_page = next.is_some();
        self.cursor = next;
        self.in_flight = None;
        self.last_error = None;
        self.pages_loaded += 1;
        true
    }

    /// Settle a failed fetch: clear the in-flight flag and keep the error
    /// for the caller. The cursor is kept so a later trigger retries it.
    pub fn on_fetch_failed(&mut self, ticket: &FetchTicket, error: FeedError) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "discarding stale fetch error");
            return false;
        }
        self.in_flight = None;
        self.last_error = Some(error);
        true
    }

    /// Drop everything loaded so far; the next trigger requests the first
    /// page again. No-op once disposed.
    pub fn reset(&mut self) {
        if self.disposed {
            return;
        }
        self.entries.clear();
        self.cursor = None;
        self.has_next_page = true;
        self.in_flight = None;
        self.last_error = None;
        self.pages_loaded = 0;
        self.generation += 1;
    }

    /// Dispose the loader. Idempotent.
    pub fn teardown(&mut self) {
        self.disposed = true;
        self.in_flight = None;
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        !self.disposed && self.in_flight.as_ref() == Some(ticket)
    }

    // ====================================================================
    // Entries
    // ====================================================================

    /// All accumulated entries, in page order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Error from the most recent failed fetch, cleared by the next page.
    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }
}

impl<T: FeedEntry> FeedLoader<T> {
    /// Top-level entries only: replies are filtered out.
    pub fn visible_entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter(|e| !e.is_reply())
    }

    /// Update the first entry with the given id in place.
    ///
    /// Returns `false` if no accumulated entry has that id.
    pub fn update_entry<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for FeedLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}
