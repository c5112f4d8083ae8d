//! Business-day calendar arithmetic.
//!
//! Pure functions, independent of projects and storage. Weekends
//! (Saturday/Sunday) are skipped; public holidays are not modelled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::types::Timestamp;

/// Whether `date` falls on a Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Advance `start` by `workdays` business days, keeping the time of day.
///
/// Each step moves to the next calendar day and only counts it when it is a
/// business day, so adding one workday to a Friday lands on Monday. Adding
/// zero workdays returns `start` unchanged, even on a weekend.
pub fn add_business_days(start: Timestamp, workdays: u32) -> Timestamp {
    let mut current = start;
    let mut remaining = workdays;

    while remaining > 0 {
        current += Duration::days(1);
        if is_business_day(current.date_naive()) {
            remaining -= 1;
        }
    }

    current
}

/// Count business days in the half-open range `(from, to]`.
///
/// Returns 0 when `to` is not after `from`.
pub fn business_days_between(from: Timestamp, to: Timestamp) -> u32 {
    let mut day = from.date_naive();
    let end = to.date_naive();
    let mut count = 0;

    while day < end {
        day = day.succ_opt().unwrap_or(day);
        if is_business_day(day) {
            count += 1;
        }
    }

    count
}
