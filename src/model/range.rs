use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SprintError};

/// An inclusive span of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = SprintError;

    fn try_from(raw: RawRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SprintError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date from start to end, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// The calendar day after `end`, if representable.
    pub fn next_day(&self) -> Option<NaiveDate> {
        self.end.checked_add_days(Days::new(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(d(2024, 1, 18), d(2024, 1, 7)).unwrap_err();
        assert!(matches!(err, SprintError::InvalidRange { .. }));
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(d(2024, 1, 7), d(2024, 1, 7)).unwrap();
        assert_eq!(range, DateRange::single(d(2024, 1, 7)));
        assert_eq!(range.num_days(), 1);
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn days_cross_leap_day() {
        let range = DateRange::new(d(2024, 2, 27), d(2024, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[2], d(2024, 2, 29));
        assert_eq!(range.num_days(), 5);
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(d(2024, 1, 7), d(2024, 1, 20)).unwrap();
        assert!(range.contains(d(2024, 1, 7)));
        assert!(range.contains(d(2024, 1, 20)));
        assert!(!range.contains(d(2024, 1, 21)));
        assert!(!range.contains(d(2024, 1, 6)));
    }

    #[test]
    fn deserialize_rejects_reversed_range() {
        let json = r#"{"start": "2024-02-01", "end": "2024-01-01"}"#;
        assert!(serde_json::from_str::<DateRange>(json).is_err());

        let json = r#"{"start": "2024-01-01", "end": "2024-02-01"}"#;
        let range: DateRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.num_days(), 32);
    }
}
