use serde::{Deserialize, Serialize};

/// One page of a cursor-paginated feed.
///
/// `next` is the cursor for the following page; `None` means this is the
/// last page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl<T> FeedPage<T> {
    pub fn new(data: Vec<T>, next: Option<String>) -> Self {
        Self { data, next }
    }

    /// A page with no continuation.
    pub fn last(data: Vec<T>) -> Self {
        Self { data, next: None }
    }

    pub fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the loader needs to know about an entry: a stable key, and whether
/// it is a reply (replies are hidden from the top-level feed view).
pub trait FeedEntry {
    fn id(&self) -> &str;

    fn is_reply(&self) -> bool {
        false
    }
}
