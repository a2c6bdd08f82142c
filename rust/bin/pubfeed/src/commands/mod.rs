pub mod feed;
pub mod format;

use anyhow::Result;
use chrono::{DateTime, Utc};

/// `--now` if given, otherwise the wall clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(pubfeed_format::parse_timestamp(s)?),
        None => Ok(Utc::now()),
    }
}
