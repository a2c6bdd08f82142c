//! pubfeed-format — presentation helpers for feed and comment UIs.
//!
//! Pure functions. Every user-facing phrase goes through a [`Translate`]
//! capability, and "now" is always an explicit argument.
//!
//! - [`relative`] — "Just now", "30 mins ago", "Yesterday", "15 Feb 2023"
//! - [`catalog`] — built-in en / zh-CN / ja / es translations
//! - [`member`] — comment author names and avatar initials
//! - [`number`] — thousands separators
//!
//! # Example
//!
//! ```ignore
//! use pubfeed_format::{Catalog, format_relative_time_str};
//!
//! let now = pubfeed_format::parse_timestamp("2024-02-15T15:00:00Z")?;
//! let label = format_relative_time_str("2024-02-15T14:30:00Z", now, &Catalog::default())?;
//! assert_eq!(label, "30 mins ago");
//! ```

pub mod catalog;
pub mod error;
pub mod member;
pub mod number;
pub mod relative;
pub mod translate;

pub use catalog::{Catalog, LOCALES};
pub use error::FormatError;
pub use member::{Member, initials, member_initials, member_name};
pub use number::format_number;
pub use relative::{
    RelativeTime, RelativeTimeFormatter, format_relative_time, format_relative_time_str,
    parse_timestamp,
};
pub use translate::{KeyTranslator, Translate, Vars};
