use chrono::{DateTime, NaiveDate};
use crate::models::ApplicationWindow;

/// Parse a window date stored as `YYYY-MM-DD` or an RFC 3339 timestamp
///
/// Anything else is treated as absent.
pub fn parse_window_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Closing date of the application window, if one is known
#[inline]
pub fn deadline(window: &ApplicationWindow) -> Option<NaiveDate> {
    window.end_date.as_deref().and_then(parse_window_date)
}

/// Opening date of the application window, if one is known
#[inline]
pub fn opening_date(window: &ApplicationWindow) -> Option<NaiveDate> {
    window.start_date.as_deref().and_then(parse_window_date)
}

/// Whether applications are accepted on `date`
///
/// Rolling windows are always open. A fixed window with neither bound known
/// is treated as closed.
pub fn is_open_on(window: &ApplicationWindow, date: NaiveDate) -> bool {
    if window.is_open_all_year {
        return true;
    }

    let start = opening_date(window);
    let end = deadline(window);

    if start.is_none() && end.is_none() {
        return false;
    }

    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}
