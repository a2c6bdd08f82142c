//! Relative time labels for feed items and comments.
//!
//! Elapsed-time buckets (seconds, minutes, hours) are mixed with
//! calendar buckets (yesterday, this year, other year). Calendar
//! comparisons use midnight at one fixed offset applied to both instants,
//! never a raw 24h subtraction: at 00:30 a timestamp from 23:00 the day
//! before is "Yesterday", while one from 00:00 is "30 mins ago".

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::FormatError;
use crate::translate::{Translate, Vars};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Translation keys emitted by the formatter.
pub mod keys {
    pub const JUST_NOW: &str = "Just now";
    pub const ONE_MIN_AGO: &str = "One min ago";
    pub const MINS_AGO: &str = "{{amount}} mins ago";
    pub const ONE_HOUR_AGO: &str = "One hour ago";
    pub const HRS_AGO: &str = "{{amount}} hrs ago";
    pub const YESTERDAY: &str = "Yesterday";
}

/// The bucket a timestamp falls into, before translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeTime {
    JustNow,
    OneMinute,
    Minutes(i64),
    Yesterday,
    OneHour,
    Hours(i64),
    /// Same calendar year as now.
    ThisYear(NaiveDate),
    OtherYear(NaiveDate),
}

impl RelativeTime {
    /// Render the bucket, sending every relative phrase through `t`.
    ///
    /// Dates are rendered as `15 Jan` / `15 Feb 2023`.
    pub fn render(&self, t: &impl Translate) -> String {
        match *self {
            RelativeTime::JustNow => t.t(keys::JUST_NOW, None),
            RelativeTime::OneMinute => t.t(keys::ONE_MIN_AGO, None),
            RelativeTime::Minutes(n) => t.t(keys::MINS_AGO, Some(Vars::amount(n))),
            RelativeTime::Yesterday => t.t(keys::YESTERDAY, None),
            RelativeTime::OneHour => t.t(keys::ONE_HOUR_AGO, None),
            RelativeTime::Hours(n) => t.t(keys::HRS_AGO, Some(Vars::amount(n))),
            RelativeTime::ThisYear(date) => date.format("%-d %b").to_string(),
            RelativeTime::OtherYear(date) => date.format("%-d %b %Y").to_string(),
        }
    }
}

/// Relative time formatter bound to a calendar offset.
///
/// The offset only matters for the calendar buckets. Use
/// [`RelativeTimeFormatter::utc`] unless the viewer's local midnight is known.
#[derive(Debug, Clone, Copy)]
pub struct RelativeTimeFormatter {
    offset: FixedOffset,
}

impl RelativeTimeFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Build from an offset in minutes east of UTC.
    ///
    /// Returns `None` if the offset is out of range (±24h).
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Classify `timestamp` relative to `now`.
    ///
    /// Timestamps after `now` are clamped to zero elapsed ("Just now").
    pub fn classify(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> RelativeTime {
        let elapsed = (now - timestamp).num_seconds().max(0);

        if elapsed < MINUTE {
            return RelativeTime::JustNow;
        }
        if elapsed < 2 * MINUTE {
            return RelativeTime::OneMinute;
        }
        if elapsed < HOUR {
            return RelativeTime::Minutes(elapsed / MINUTE);
        }

        let date = timestamp.with_timezone(&self.offset).date_naive();
        let today = now.with_timezone(&self.offset).date_naive();

        // A calendar-day crossing wins over every hour bucket.
        if today.pred_opt() == Some(date) {
            return RelativeTime::Yesterday;
        }
        if elapsed < 2 * HOUR {
            return RelativeTime::OneHour;
        }
        if elapsed < DAY {
            return RelativeTime::Hours(elapsed / HOUR);
        }

        if date.year() == today.year() {
            RelativeTime::ThisYear(date)
        } else {
            RelativeTime::OtherYear(date)
        }
    }

    /// Format `timestamp` relative to `now`.
    pub fn format(
        &self,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
        t: &impl Translate,
    ) -> String {
        self.classify(timestamp, now).render(t)
    }

    /// Parse an RFC 3339 timestamp, then format it.
    pub fn format_str(
        &self,
        timestamp: &str,
        now: DateTime<Utc>,
        t: &impl Translate,
    ) -> Result<String, FormatError> {
        let ts = parse_timestamp(timestamp)?;
        Ok(self.format(ts, now, t))
    }
}

impl Default for RelativeTimeFormatter {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parse an RFC 3339 / ISO-8601 instant into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, FormatError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FormatError::InvalidTimestamp {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

/// Format with UTC calendar boundaries.
pub fn format_relative_time(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    t: &impl Translate,
) -> String {
    RelativeTimeFormatter::utc().format(timestamp, now, t)
}

/// Parse an RFC 3339 string and format it with UTC calendar boundaries.
pub fn format_relative_time_str(
    timestamp: &str,
    now: DateTime<Utc>,
    t: &impl Translate,
) -> Result<String, FormatError> {
    RelativeTimeFormatter::utc().format_str(timestamp, now, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::KeyTranslator;

    fn at(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn fmt(ts: &str, now: &str) -> String {
        format_relative_time_str(ts, at(now), &KeyTranslator).unwrap()
    }

    const NOW: &str = "2024-02-15T15:00:00.000Z";

    // ========================================================================
    // Buckets
    // ========================================================================

    #[test]
    fn just_now() {
        assert_eq!(fmt("2024-02-15T14:59:57.000Z", NOW), "Just now");
        assert_eq!(fmt("2024-02-15T14:59:30.000Z", NOW), "Just now");
        assert_eq!(fmt("2024-02-15T14:59:01.000Z", NOW), "Just now");
        assert_eq!(fmt(NOW, NOW), "Just now");
    }

    #[test]
    fn one_minute_ago() {
        assert_eq!(fmt("2024-02-15T14:59:00.000Z", NOW), "One min ago");
        assert_eq!(fmt("2024-02-15T14:58:01.000Z", NOW), "One min ago");
    }

    #[test]
    fn multiple_minutes_ago() {
        assert_eq!(fmt("2024-02-15T14:58:00.000Z", NOW), "2 mins ago");
        assert_eq!(fmt("2024-02-15T14:30:00.000Z", NOW), "30 mins ago");
        assert_eq!(fmt("2024-02-15T14:01:00.000Z", NOW), "59 mins ago");
    }

    #[test]
    fn one_hour_ago() {
        assert_eq!(fmt("2024-02-15T14:00:00.000Z", NOW), "One hour ago");
        assert_eq!(fmt("2024-02-15T13:00:01.000Z", NOW), "One hour ago");
    }

    #[test]
    fn multiple_hours_ago() {
        assert_eq!(fmt("2024-02-15T13:00:00.000Z", NOW), "2 hrs ago");
        assert_eq!(fmt("2024-02-15T12:00:00.000Z", NOW), "3 hrs ago");
        assert_eq!(fmt("2024-02-15T00:00:00.000Z", NOW), "15 hrs ago");
    }

    #[test]
    fn yesterday() {
        assert_eq!(fmt("2024-02-14T15:00:00.000Z", NOW), "Yesterday");
        assert_eq!(fmt("2024-02-14T00:00:00.000Z", NOW), "Yesterday");
        assert_eq!(fmt("2024-02-14T23:59:59.000Z", NOW), "Yesterday");
    }

    #[test]
    fn date_in_current_year() {
        assert_eq!(fmt("2024-01-15T15:00:00.000Z", NOW), "15 Jan");
        assert_eq!(fmt("2024-02-13T15:00:00.000Z", NOW), "13 Feb");
        assert_eq!(fmt("2024-02-01T08:00:00.000Z", NOW), "1 Feb");
    }

    #[test]
    fn date_in_different_year() {
        assert_eq!(fmt("2023-02-15T15:00:00.000Z", NOW), "15 Feb 2023");
        assert_eq!(fmt("2023-12-15T15:00:00.000Z", NOW), "15 Dec 2023");
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    #[test]
    fn minutes_to_hours_at_sixty_minutes() {
        assert_eq!(fmt("2024-02-15T14:01:00.000Z", NOW), "59 mins ago");
        assert_eq!(fmt("2024-02-15T14:00:00.000Z", NOW), "One hour ago");
    }

    #[test]
    fn hours_to_yesterday_at_calendar_day_change() {
        let now = "2024-02-15T00:30:00.000Z";
        assert_eq!(fmt("2024-02-14T23:00:00.000Z", now), "Yesterday");
        assert_eq!(fmt("2024-02-15T00:00:00.000Z", now), "30 mins ago");
    }

    #[test]
    fn minutes_across_midnight_stay_minutes() {
        let now = "2024-02-15T00:10:00.000Z";
        assert_eq!(fmt("2024-02-14T23:55:00.000Z", now), "15 mins ago");
        assert_eq!(fmt("2024-02-14T23:59:30.000Z", "2024-02-15T00:00:10.000Z"), "Just now");
    }

    #[test]
    fn yesterday_to_date_format() {
        assert_eq!(fmt("2024-02-14T15:00:00.000Z", NOW), "Yesterday");
        assert_eq!(fmt("2024-02-13T15:00:00.000Z", NOW), "13 Feb");
    }

    #[test]
    fn yesterday_across_new_year_shows_yesterday() {
        assert_eq!(
            fmt("2023-12-31T20:00:00.000Z", "2024-01-01T09:00:00.000Z"),
            "Yesterday"
        );
        assert_eq!(
            fmt("2023-12-30T20:00:00.000Z", "2024-01-01T09:00:00.000Z"),
            "30 Dec 2023"
        );
    }

    // ========================================================================
    // Offsets and edge cases
    // ========================================================================

    #[test]
    fn future_timestamp_is_just_now() {
        assert_eq!(fmt("2024-02-15T16:00:00.000Z", NOW), "Just now");
        assert_eq!(fmt("2025-01-01T00:00:00.000Z", NOW), "Just now");
    }

    #[test]
    fn offset_moves_midnight() {
        // 23:00 and 00:30 UTC are the same calendar day at UTC+2.
        let f = RelativeTimeFormatter::with_offset_minutes(120).unwrap();
        let s = f.format(
            at("2024-02-14T23:00:00Z"),
            at("2024-02-15T00:30:00Z"),
            &KeyTranslator,
        );
        assert_eq!(s, "One hour ago");

        // At UTC-1 "now" is already past local midnight.
        let f = RelativeTimeFormatter::with_offset_minutes(-60).unwrap();
        let s = f.format(
            at("2024-02-14T22:00:00Z"),
            at("2024-02-15T02:00:00Z"),
            &KeyTranslator,
        );
        assert_eq!(s, "Yesterday");
    }

    #[test]
    fn offset_out_of_range() {
        assert!(RelativeTimeFormatter::with_offset_minutes(25 * 60).is_none());
    }

    #[test]
    fn non_utc_input_is_normalized() {
        assert_eq!(fmt("2024-02-15T16:30:00+02:00", NOW), "30 mins ago");
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let err = format_relative_time_str("yesterday-ish", at(NOW), &KeyTranslator).unwrap_err();
        assert!(matches!(err, FormatError::InvalidTimestamp { .. }));
    }

    #[test]
    fn classify_exposes_amounts() {
        let f = RelativeTimeFormatter::utc();
        assert_eq!(
            f.classify(at("2024-02-15T14:30:00Z"), at(NOW)),
            RelativeTime::Minutes(30)
        );
        assert_eq!(
            f.classify(at("2024-02-15T12:00:00Z"), at(NOW)),
            RelativeTime::Hours(3)
        );
    }

    #[test]
    fn translator_receives_keys_and_amounts() {
        let t = |key: &str, vars: Option<Vars>| match (key, vars) {
            (keys::MINS_AGO, Some(v)) => format!("hace {} min", v.amount),
            (keys::YESTERDAY, None) => "Ayer".to_string(),
            _ => key.to_string(),
        };
        assert_eq!(format_relative_time(at("2024-02-15T14:30:00Z"), at(NOW), &t), "hace 30 min");
        assert_eq!(format_relative_time(at("2024-02-14T14:30:00Z"), at(NOW), &t), "Ayer");
    }
}
