use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::error::{Result, SprintError};
use crate::model::DateRange;

/// Standard hours in one working day (35-hour, 5-day week).
pub const HOURS_PER_WORKING_DAY: f64 = 7.0;

pub const WORKING_DAYS_PER_WEEK: u32 = 5;

/// Sunday through Thursday are working days; Friday and Saturday never are.
pub fn is_working_day(date: NaiveDate) -> bool {
    date.weekday().num_days_from_sunday() <= 4
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_working_day: bool,
}

/// Every date from `start` to `end` inclusive, tagged working/weekend.
pub fn enumerate_days(start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarDay>> {
    let range = DateRange::new(start, end)?;
    Ok(classify(&range))
}

pub fn classify(range: &DateRange) -> Vec<CalendarDay> {
    range
        .days()
        .map(|date| CalendarDay {
            date,
            is_working_day: is_working_day(date),
        })
        .collect()
}

pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> Result<i64> {
    let range = DateRange::new(start, end)?;
    Ok(working_days_in(&range))
}

pub fn working_days_in(range: &DateRange) -> i64 {
    range.days().filter(|d| is_working_day(*d)).count() as i64
}

// --- Parsing ---

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its UTC date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc().date())
        .map_err(|_| SprintError::InvalidDate(format!("expected YYYY-MM-DD: {s}")))
}

/// Parse an RFC 3339 timestamp (as UTC), `YYYY-MM-DDTHH:MM[:SS]`, or a bare
/// date meaning midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| SprintError::InvalidDate(format!("expected a date or timestamp: {s}")))
}
