use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SprintError};
use crate::model::DateRange;

/// A resolved sprint, computed on demand for a date and a reference `now`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SprintInfo {
    pub sprint_number: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub length_weeks: u32,
    pub is_current_for_date: bool,
    pub days_remaining: i64,
    pub working_days_remaining: i64,
    pub progress_percentage: u8,
    pub is_active: bool,
}

impl SprintInfo {
    pub fn range(&self) -> DateRange {
        // start <= end by construction in the detector
        DateRange::new(self.start_date, self.end_date)
            .unwrap_or_else(|_| DateRange::single(self.start_date))
    }
}

/// The flat record shape older persisted sprint settings use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacySprintRecord {
    pub id: String,
    pub current_sprint_number: i64,
    pub sprint_length_weeks: u32,
    pub sprint_start_date: String,
    pub sprint_end_date: String,
    pub progress_percentage: u8,
    pub days_remaining: i64,
    pub working_days_remaining: i64,
    pub is_active: bool,
}

const ISO_DATE: &str = "%Y-%m-%d";

impl LegacySprintRecord {
    pub fn from_sprint(sprint: &SprintInfo) -> Self {
        Self {
            id: format!("sprint-{}", sprint.sprint_number),
            current_sprint_number: sprint.sprint_number,
            sprint_length_weeks: sprint.length_weeks,
            sprint_start_date: sprint.start_date.format(ISO_DATE).to_string(),
            sprint_end_date: sprint.end_date.format(ISO_DATE).to_string(),
            progress_percentage: sprint.progress_percentage,
            days_remaining: sprint.days_remaining,
            working_days_remaining: sprint.working_days_remaining,
            is_active: sprint.is_active,
        }
    }

    /// Parse the stored ISO dates back into a range.
    pub fn date_range(&self) -> Result<DateRange> {
        let start = parse_iso(&self.sprint_start_date)?;
        let end = parse_iso(&self.sprint_end_date)?;
        DateRange::new(start, end)
    }
}

impl From<&SprintInfo> for LegacySprintRecord {
    fn from(sprint: &SprintInfo) -> Self {
        Self::from_sprint(sprint)
    }
}

fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, ISO_DATE)
        .map_err(|_| SprintError::InvalidDate(format!("not an ISO date: {s}")))
}
