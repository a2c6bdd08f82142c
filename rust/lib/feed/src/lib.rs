//! pubfeed-feed — cursor-paginated infinite scrolling.
//!
//! A feed grows one page at a time whenever the sentinel at its bottom
//! becomes visible. At most one page fetch is in flight, and once a page
//! arrives without a `next` cursor nothing is fetched again.
//!
//! # Pieces
//!
//! - [`FeedLoader`] — the synchronous state machine (`Idle`, `Fetching`,
//!   `Exhausted`, `Disposed`)
//! - [`VisibilitySignal`] — subscribe/unsubscribe to sentinel visibility;
//!   [`Sentinel`] is the in-process implementation
//! - [`PageSource`] — async `fetch_page(cursor)`; closures work too
//! - [`FeedController`] — ties the three together on a tokio runtime
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pubfeed_feed::{FeedController, Sentinel, StaticPages};
//!
//! let sentinel = Arc::new(Sentinel::new());
//! let feed = FeedController::new(StaticPages::new(chunks), sentinel.clone())?;
//!
//! sentinel.set_intersecting(true);
//! feed.wait_idle().await;
//! println!("{} entries", feed.entries().len());
//! ```

pub mod controller;
pub mod error;
pub mod loader;
pub mod page;
pub mod signal;
pub mod source;

pub use controller::FeedController;
pub use error::FeedError;
pub use loader::{FeedLoader, FeedLoaderState, FetchTicket, LoaderPhase};
pub use page::{FeedEntry, FeedPage};
pub use signal::{Sentinel, SubscriptionId, VisibilityHandler, VisibilitySignal};
pub use source::{BoxFuture, PageSource, StaticPages};
