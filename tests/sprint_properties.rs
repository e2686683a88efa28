use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use sprintcap::model::{PreAnchorPolicy, SprintConfig};
use sprintcap::{LegacySprintRecord, SprintDetector};

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

fn detector(weeks: u32) -> SprintDetector {
    SprintDetector::new(SprintConfig::new(anchor(), weeks).unwrap()).unwrap()
}

/// Dates roughly 2014..2034 around the anchor, including pre-anchor ones.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (-3650i64..3650).prop_map(|offset| {
        if offset >= 0 {
            anchor() + Days::new(offset as u64)
        } else {
            anchor() - Days::new(offset.unsigned_abs())
        }
    })
}

proptest! {
    #[test]
    fn later_dates_never_map_to_earlier_sprints(
        a in any_date(),
        b in any_date(),
        weeks in 1u32..5,
    ) {
        let (d1, d2) = if a <= b { (a, b) } else { (b, a) };
        let det = detector(weeks);
        let (n1, r1) = det.detect_range(d1).unwrap();
        let (n2, r2) = det.detect_range(d2).unwrap();
        prop_assert!(n2 >= n1);
        prop_assert!(r2.start() >= r1.start());
    }

    #[test]
    fn resolved_sprint_contains_date(date in any_date(), weeks in 1u32..5) {
        let (_, range) = detector(weeks).detect_range(date).unwrap();
        prop_assert!(range.start() <= date && date <= range.end());
        prop_assert_eq!(range.num_days(), i64::from(weeks) * 7);
    }

    #[test]
    fn next_sprint_starts_the_day_after(date in any_date(), weeks in 1u32..5) {
        let det = detector(weeks);
        let (number, range) = det.detect_range(date).unwrap();
        let next = det.sprint_bounds(number + 1).unwrap();
        prop_assert_eq!(range.next_day().unwrap(), next.start());
        prop_assert_eq!(det.sprint_number(next.start()).unwrap(), number + 1);
    }

    #[test]
    fn sprints_always_start_on_sunday(date in any_date(), weeks in 1u32..5) {
        use chrono::{Datelike, Weekday};
        let (_, range) = detector(weeks).detect_range(date).unwrap();
        prop_assert_eq!(range.start().weekday(), Weekday::Sun);
        prop_assert_eq!(range.end().weekday(), Weekday::Sat);
    }

    #[test]
    fn legacy_record_keeps_boundaries(date in any_date()) {
        let det = detector(2);
        let now = date.and_hms_opt(9, 0, 0).unwrap();
        let info = det.detect_sprint_for_date(date, now).unwrap();
        let range = LegacySprintRecord::from_sprint(&info).date_range().unwrap();
        prop_assert_eq!(range.start(), info.start_date);
        prop_assert_eq!(range.end(), info.end_date);
    }

    #[test]
    fn reject_policy_only_fails_before_anchor(date in any_date()) {
        let config = SprintConfig::new(anchor(), 2).unwrap().with_policy(PreAnchorPolicy::Reject);
        let det = SprintDetector::new(config).unwrap();
        prop_assert_eq!(det.detect_range(date).is_ok(), date >= anchor());
    }
}

#[test]
fn every_day_of_a_leap_year_is_covered_once() {
    let det = detector(2);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let mut previous: Option<(i64, NaiveDate)> = None;
    for day in start.iter_days().take_while(|d| *d <= end) {
        let (number, range) = det.detect_range(day).unwrap();
        assert!(range.contains(day));
        if let Some((prev_number, prev_start)) = previous {
            if prev_number == number {
                assert_eq!(prev_start, range.start());
            } else {
                assert_eq!(number, prev_number + 1, "skipped a sprint at {day}");
                assert_eq!(range.start(), day);
            }
        }
        previous = Some((number, range.start()));
    }
}
