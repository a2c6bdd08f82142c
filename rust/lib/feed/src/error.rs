use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The page source failed; the message is surfaced to the UI layer.
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("unknown cursor: {0}")]
    UnknownCursor(String),

    #[error("no async runtime: {0}")]
    Runtime(String),
}
