mod report;

pub use report::{create_sprint_detection_report, render_schedule_rows};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

use crate::calendar;
use crate::error::{Result, SprintError};
use crate::model::{DateRange, PreAnchorPolicy, SprintConfig, SprintInfo};
use crate::progress;

/// Earliest sprint start the detector resolves.
pub const MIN_SPRINT_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
    Some(d) => d,
    None => NaiveDate::MIN,
};

/// Latest sprint end the detector resolves.
pub const MAX_SPRINT_DATE: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
    Some(d) => d,
    None => NaiveDate::MAX,
};

/// Maps calendar dates to sprints by fixed-length offsets from the anchor.
///
/// The mapping is closed-form: `index = floor(days_since_anchor / length)`.
/// It never steps through months, so month lengths and leap days cannot
/// make a later date resolve to an earlier sprint.
#[derive(Debug, Clone)]
pub struct SprintDetector {
    config: SprintConfig,
}

/// One row of the expected sprint schedule.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduledSprint {
    pub number: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub working_days: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContainmentCheck {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SprintDetector {
    pub fn new(config: SprintConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SprintConfig {
        &self.config
    }

    pub fn anchor(&self) -> NaiveDate {
        self.config.first_sprint_start_date
    }

    pub fn days_since_anchor(&self, date: NaiveDate) -> i64 {
        (date - self.anchor()).num_days()
    }

    /// Zero-based sprint index. Floor division keeps pre-anchor dates
    /// well-ordered: the day before the anchor is index -1.
    pub fn sprint_index(&self, date: NaiveDate) -> Result<i64> {
        let days = self.days_since_anchor(date);
        if days < 0 && self.config.pre_anchor_policy == PreAnchorPolicy::Reject {
            return Err(SprintError::DateBeforeFirstSprint {
                date,
                anchor: self.anchor(),
            });
        }
        Ok(days.div_euclid(self.config.sprint_length_days()))
    }

    pub fn sprint_number(&self, date: NaiveDate) -> Result<i64> {
        Ok(self.sprint_index(date)? + 1)
    }

    /// Start and end of sprint `number` (1-based). Sprints must lie within
    /// four-digit years so their ISO dates read back unchanged.
    pub fn sprint_bounds(&self, number: i64) -> Result<DateRange> {
        let index = number
            .checked_sub(1)
            .ok_or_else(|| SprintError::Other(format!("sprint number {number} out of range")))?;
        let length = self.config.sprint_length_days();
        let start = self.offset_anchor(index.checked_mul(length))?;
        if index < 0 && self.config.pre_anchor_policy == PreAnchorPolicy::Reject {
            return Err(SprintError::DateBeforeFirstSprint {
                date: start,
                anchor: self.anchor(),
            });
        }
        let end = offset(start, Some(length - 1))?;
        if start < MIN_SPRINT_DATE || end > MAX_SPRINT_DATE {
            return Err(SprintError::InvalidDate(format!(
                "sprint {number} ({start} → {end}) is outside {MIN_SPRINT_DATE} → {MAX_SPRINT_DATE}"
            )));
        }
        DateRange::new(start, end)
    }

    /// The sprint number and window containing `date`.
    pub fn detect_range(&self, date: NaiveDate) -> Result<(i64, DateRange)> {
        let number = self.sprint_number(date)?;
        let range = self.sprint_bounds(number)?;
        Ok((number, range))
    }

    /// Resolve the sprint containing `date`. Relative fields (remaining days,
    /// progress, activity) are measured at `now`.
    pub fn detect_sprint_for_date(&self, date: NaiveDate, now: NaiveDateTime) -> Result<SprintInfo> {
        let (number, range) = self.detect_range(date)?;
        let today = now.date();

        let info = SprintInfo {
            sprint_number: number,
            start_date: range.start(),
            end_date: range.end(),
            length_weeks: self.config.sprint_length_weeks,
            is_current_for_date: range.contains(today),
            days_remaining: progress::calculate_days_remaining(range.end(), today),
            working_days_remaining: progress::working_days_remaining_in(&range, today),
            progress_percentage: progress::sprint_progress_in(&range, now),
            is_active: today <= range.end(),
        };
        debug!(
            %date,
            sprint = info.sprint_number,
            start = %info.start_date,
            end = %info.end_date,
            "resolved sprint"
        );
        Ok(info)
    }

    /// `count` consecutive sprints starting at sprint `from`.
    pub fn schedule(&self, from: i64, count: usize) -> Result<Vec<ScheduledSprint>> {
        let mut rows = Vec::new();
        let mut number = from;
        for i in 0..count {
            if i > 0 {
                number = number
                    .checked_add(1)
                    .ok_or_else(|| SprintError::Other("sprint number out of range".into()))?;
            }
            let range = self.sprint_bounds(number)?;
            rows.push(ScheduledSprint {
                number,
                start: range.start(),
                end: range.end(),
                working_days: calendar::working_days_in(&range),
            });
        }
        Ok(rows)
    }

    /// Sprint `number` with up to `window` sprints on each side. Under the
    /// `Reject` policy the window starts no earlier than sprint 1.
    pub fn schedule_window(&self, number: i64, window: usize) -> Result<Vec<ScheduledSprint>> {
        let out_of_range = || SprintError::Other(format!("schedule window {window} out of range"));
        let window = i64::try_from(window).map_err(|_| out_of_range())?;
        let mut from = number.checked_sub(window).ok_or_else(out_of_range)?;
        if self.config.pre_anchor_policy == PreAnchorPolicy::Reject {
            from = from.max(1);
        }
        let last = number.checked_add(window).ok_or_else(out_of_range)?;
        let count = last
            .checked_sub(from)
            .and_then(|n| n.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(out_of_range)?;
        self.schedule(from, count)
    }

    fn offset_anchor(&self, days: Option<i64>) -> Result<NaiveDate> {
        offset(self.anchor(), days)
    }
}

fn offset(date: NaiveDate, days: Option<i64>) -> Result<NaiveDate> {
    days.and_then(TimeDelta::try_days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| SprintError::InvalidDate(format!("sprint offset from {date} out of range")))
}

/// Check that `date` falls inside the sprint window.
pub fn validate_sprint_contains_date(sprint: &SprintInfo, date: NaiveDate) -> ContainmentCheck {
    if date < sprint.start_date {
        ContainmentCheck {
            is_valid: false,
            reason: Some(format!(
                "{date} is before sprint {} start {}",
                sprint.sprint_number, sprint.start_date
            )),
        }
    } else if date > sprint.end_date {
        ContainmentCheck {
            is_valid: false,
            reason: Some(format!(
                "{date} is after sprint {} end {}",
                sprint.sprint_number, sprint.end_date
            )),
        }
    } else {
        ContainmentCheck {
            is_valid: true,
            reason: None,
        }
    }
}
