//! Time related utils.

use chrono::SecondsFormat;
use chrono::Utc;

use crate::Error;
use crate::Result;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601 with millisecond precision: `2022-03-01T08:12:34.567Z`
///
/// Sub-millisecond digits are truncated, never rounded, so the output
/// matches what browsers produce for `Date.prototype.toISOString`.
pub fn format_iso8601_millis(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            Error::request_invalid(format!("invalid RFC 3339 timestamp: {s}"))
                .with_source(anyhow::Error::from(e))
        })
}
