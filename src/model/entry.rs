use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One member's recorded commitment for one day. `None` means no entry was
/// made, `Some(0.0)` means explicitly unavailable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub hours: Option<f64>,
}

impl ScheduleEntry {
    pub fn new(hours: Option<f64>) -> Self {
        Self { hours }
    }
}

/// A schedule entry keyed by member and date, as stored in `entries.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberDayEntry {
    pub member: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub hours: Option<f64>,
}

impl MemberDayEntry {
    pub fn entry(&self) -> ScheduleEntry {
        ScheduleEntry::new(self.hours)
    }
}
