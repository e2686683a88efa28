use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::calendar;
use crate::error::Result;
use crate::model::DateRange;

/// Completion may trail elapsed time by this many percentage points and
/// still count as on track.
pub const ON_TRACK_TOLERANCE: i64 = 10;

// ─── Time progress ───────────────────────────────────────────

/// Percentage of the sprint window elapsed at `now`. The window runs from
/// midnight on `start` to midnight after `end`.
pub fn calculate_sprint_progress(start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> Result<u8> {
    let range = DateRange::new(start, end)?;
    Ok(sprint_progress_in(&range, now))
}

pub fn sprint_progress_in(range: &DateRange, now: NaiveDateTime) -> u8 {
    let window_start = range.start().and_time(NaiveTime::MIN);
    let window_end = match range.next_day() {
        Some(next) => next.and_time(NaiveTime::MIN),
        None => range.end().and_time(NaiveTime::MIN),
    };

    if now <= window_start {
        return 0;
    }
    if now >= window_end {
        return 100;
    }

    let total = (window_end - window_start).num_seconds() as f64;
    let elapsed = (now - window_start).num_seconds() as f64;
    (elapsed / total * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Calendar days from `today` to `end`, floored at zero.
pub fn calculate_days_remaining(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days().max(0)
}

/// Working days from `max(today, start)` through `end`; zero once the
/// sprint is over.
pub fn calculate_working_days_remaining(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<i64> {
    let range = DateRange::new(start, end)?;
    Ok(working_days_remaining_in(&range, today))
}

pub fn working_days_remaining_in(range: &DateRange, today: NaiveDate) -> i64 {
    if today > range.end() {
        return 0;
    }
    let from = today.max(range.start());
    match DateRange::new(from, range.end()) {
        Ok(rest) => calendar::working_days_in(&rest),
        Err(_) => 0,
    }
}

// ─── On-track ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SprintProgressInfo {
    pub sprint_progress_percentage: u8,
    pub is_on_track: bool,
}

pub fn calculate_sprint_progress_info(
    start: NaiveDate,
    end: NaiveDate,
    completion_percentage: u32,
    now: NaiveDateTime,
) -> Result<SprintProgressInfo> {
    let sprint_progress_percentage = calculate_sprint_progress(start, end, now)?;
    Ok(SprintProgressInfo {
        sprint_progress_percentage,
        is_on_track: is_on_track(completion_percentage, sprint_progress_percentage),
    })
}

pub fn is_on_track(completion_percentage: u32, time_progress_percentage: u8) -> bool {
    i64::from(completion_percentage) >= i64::from(time_progress_percentage) - ON_TRACK_TOLERANCE
}

// ─── Health ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn color(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "green",
            HealthStatus::Good => "blue",
            HealthStatus::Warning => "yellow",
            HealthStatus::Critical => "red",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SprintHealth {
    pub status: HealthStatus,
    pub color: &'static str,
}

pub fn get_sprint_health_status(
    completion_percentage: u32,
    time_progress_percentage: u8,
    days_remaining: i64,
) -> SprintHealth {
    let status = if completion_percentage >= 90 {
        HealthStatus::Excellent
    } else if completion_percentage >= 80 {
        HealthStatus::Good
    } else if completion_percentage < 50 && days_remaining <= 1 {
        HealthStatus::Critical
    } else {
        HealthStatus::Warning
    };
    tracing::debug!(
        completion_percentage,
        time_progress_percentage,
        days_remaining,
        status = status.as_str(),
        "sprint health"
    );
    SprintHealth {
        status,
        color: status.color(),
    }
}
