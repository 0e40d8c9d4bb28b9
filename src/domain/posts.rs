//! Pure helpers over post content: snippets, date labels and timestamps.

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

use crate::domain::error::DomainError;

pub const SHORT_SNIPPET_LIMIT: usize = 150;
pub const LONG_SNIPPET_LIMIT: usize = 900;

pub const FULL_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:long], [month repr:long] [day padding:none], [year]");
pub const ISO8601_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

/// Summary used on cards and the profile page.
pub fn short_snippet(contents: &str) -> String {
    snippet(contents, SHORT_SNIPPET_LIMIT)
}

/// Summary used in the main post listings.
pub fn long_snippet(contents: &str) -> String {
    snippet(contents, LONG_SNIPPET_LIMIT)
}

/// Accumulate whole lines until more than `limit` characters are collected.
///
/// The line that crosses the limit is kept, so the result may exceed `limit`.
/// Every emitted line is newline-terminated.
pub fn snippet(contents: &str, limit: usize) -> String {
    let normalized = contents.replace("\r\n", "\n");
    let mut snippet = String::new();
    let mut count = 0usize;

    for line in normalized.split('\n') {
        snippet.push_str(line);
        snippet.push('\n');
        count += line.chars().count() + 1;
        if count > limit {
            break;
        }
    }

    snippet
}

/// Long English date in UTC, e.g. `Monday, January 1, 2024`.
pub fn format_full_date(moment: OffsetDateTime) -> String {
    moment
        .to_offset(UtcOffset::UTC)
        .format(FULL_DATE_FORMAT)
        .unwrap_or_default()
}

/// Second-precision ISO-8601 timestamp in UTC, e.g. `2024-01-01T09:30:00+0000`.
pub fn format_iso8601(moment: OffsetDateTime) -> String {
    moment
        .to_offset(UtcOffset::UTC)
        .format(ISO8601_FORMAT)
        .unwrap_or_default()
}

/// Seconds since the Unix epoch, the unit posts are stored with.
pub fn to_epoch_seconds(moment: OffsetDateTime) -> f64 {
    moment.unix_timestamp_nanos() as f64 / 1_000_000_000.0
}

pub fn from_epoch_seconds(value: f64) -> Result<OffsetDateTime, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::TimestampOutOfRange { value });
    }

    let nanos = (value * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|_| DomainError::TimestampOutOfRange { value })
}
