use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::FeedError;
use crate::page::FeedPage;

/// A boxed, `Send`-able future borrowed from its source.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where pages come from: an HTTP client, a local cache, a fixture.
///
/// `cursor` is `None` for the first page, otherwise the `next` value of the
/// previously loaded page.
pub trait PageSource<T>: Send + Sync {
    fn fetch_page(&self, cursor: Option<String>) -> BoxFuture<'_, Result<FeedPage<T>, FeedError>>;
}

/// Convenience: async closures implement PageSource.
impl<T, F, Fut> PageSource<T> for F
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FeedPage<T>, FeedError>> + Send + 'static,
{
    fn fetch_page(&self, cursor: Option<String>) -> BoxFuture<'_, Result<FeedPage<T>, FeedError>> {
        Box::pin((self)(cursor))
    }
}

/// In-memory pages, served by cursor.
///
/// The first page answers `None`; every other page answers the `next`
/// cursor of the page before it.
pub struct StaticPages<T> {
    pages: Vec<FeedPage<T>>,
    by_cursor: HashMap<String, usize>,
    fetches: AtomicUsize,
}

impl<T: Clone + Send + Sync> StaticPages<T> {
    /// Chain raw entry chunks into pages with cursors `"1"`, `"2"`, ...
    pub fn new(chunks: Vec<Vec<T>>) -> Self {
        let count = chunks.len();
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(i, data)| {
                let next = (i + 1 < count).then(|| (i + 1).to_string());
                FeedPage::new(data, next)
            })
            .collect();
        Self::from_pages(pages)
    }

    /// Serve pre-built pages. Pages after the first must be reachable via
    /// the previous page's `next` cursor.
    pub fn from_pages(pages: Vec<FeedPage<T>>) -> Self {
        let by_cursor = pages
            .iter()
            .enumerate()
            .filter_map(|(i, page)| page.next.clone().map(|cursor| (cursor, i + 1)))
            .filter(|(_, idx)| *idx < pages.len())
            .collect();
        Self {
            pages,
            by_cursor,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch_page` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn page_for(&self, cursor: Option<&str>) -> Result<FeedPage<T>, FeedError> {
        let idx = match cursor {
            None => 0,
            Some(c) => *self
                .by_cursor
                .get(c)
                .ok_or_else(|| FeedError::UnknownCursor(c.to_string()))?,
        };
        Ok(self
            .pages
            .get(idx)
            .cloned()
            .unwrap_or_else(|| FeedPage::last(Vec::new())))
    }
}

impl<T: Clone + Send + Sync> PageSource<T> for StaticPages<T> {
    fn fetch_page(&self, cursor: Option<String>) -> BoxFuture<'_, Result<FeedPage<T>, FeedError>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let result = self.page_for(cursor.as_deref());
        Box::pin(std::future::ready(result))
    }
}
