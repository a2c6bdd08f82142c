//! Visibility signals — "the sentinel at the bottom of the feed is on screen".
//!
//! The loader only consumes a boolean intersection signal. Where it comes
//! from (a viewport observer, a terminal pager, a test) sits behind
//! [`VisibilitySignal`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Callback invoked with `is_intersecting` on every visibility change.
pub type VisibilityHandler = Arc<dyn Fn(bool) + Send + Sync>;

/// Unique handle for a subscription, returned by `VisibilitySignal::subscribe()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// A source of intersection notifications.
pub trait VisibilitySignal: Send + Sync {
    /// Register a handler. It is called on every later change, never
    /// from inside `subscribe` itself.
    fn subscribe(&self, handler: VisibilityHandler) -> SubscriptionId;

    /// Remove a handler. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Whether the sentinel is visible right now.
    fn is_visible(&self) -> bool;
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: VisibilityHandler,
}

/// In-process sentinel: whoever owns the viewport calls
/// [`Sentinel::set_intersecting`], subscribers are notified synchronously.
pub struct Sentinel {
    handlers: RwLock<Vec<HandlerEntry>>,
    next_id: AtomicU64,
    visible: AtomicBool,
}

impl Sentinel {
    /// A sentinel that starts off screen.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            visible: AtomicBool::new(false),
        }
    }

    /// Record the new intersection state and notify every subscriber.
    ///
    /// Handlers run on the calling thread, after the handler list lock is
    /// released, so a handler may subscribe or unsubscribe.
    pub fn set_intersecting(&self, is_intersecting: bool) {
        self.visible.store(is_intersecting, Ordering::SeqCst);
        let entries = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for entry in entries {
            (entry.handler)(is_intersecting);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilitySignal for Sentinel {
    fn subscribe(&self, handler: VisibilityHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerEntry { id, handler });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|entry| entry.id != id);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}
