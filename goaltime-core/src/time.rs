//! Calendar date and window helpers
//!
//! Dates arrive as `YYYY-MM-DD` strings and are interpreted at midnight in
//! the local timezone; all arithmetic afterwards happens on UTC instants.

use crate::types::{Result, Timestamp, TrackerError};
use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};

/// Extra lookback slack, in days, added when requesting events so the
/// window start is guaranteed to be covered
const LOOKBACK_SLACK_DAYS: i64 = 2;

/// Parse a `YYYY-MM-DD` date string into a UTC instant at local midnight
///
/// With `inclusive` set, the date is advanced by one day first - used for
/// end dates so the whole final day falls inside the window.
pub fn datetime_from_date(date: &str, inclusive: bool) -> Result<Timestamp> {
    let mut naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| TrackerError::InvalidDate(date.to_string()))?;

    if inclusive {
        naive += Duration::days(1);
    }

    let midnight = naive
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TrackerError::InvalidDate(date.to_string()))?;

    // Midnight can be skipped or duplicated by a DST transition; neither
    // case has a single correct answer, so reject it.
    let local = Local
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| TrackerError::InvalidDate(date.to_string()))?;

    Ok(local.with_timezone(&Utc))
}

/// Compute the `[start, end)` window for an inclusive calendar date range
pub fn window_from_dates(start_date: &str, end_date: &str) -> Result<(Timestamp, Timestamp)> {
    let start_time = datetime_from_date(start_date, false)?;
    let end_time = datetime_from_date(end_date, true)?;
    Ok((start_time, end_time))
}

/// How many days of history to request so that `start_time` is covered
///
/// Whole days between `now` and the window start, plus slack. A window
/// starting in the future still yields the slack, never a negative count.
pub fn lookback_days(now: Timestamp, start_time: Timestamp) -> i64 {
    let days = (now - start_time).num_days();
    days.max(0) + LOOKBACK_SLACK_DAYS
}

/// Parse an ISO-8601 / RFC 3339 wire timestamp into a UTC instant
pub fn parse_wire_timestamp(raw: &str) -> Result<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TrackerError::TimestampParse {
            raw: raw.to_string(),
            source: e,
        })
}
