use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::SprintDetector;
use crate::calendar;
use crate::error::Result;

/// Human-readable dump of how `date` resolves: input, resolved sprint, the
/// boundary arithmetic, status at `now`, and the surrounding schedule.
pub fn create_sprint_detection_report(
    detector: &SprintDetector,
    date: NaiveDate,
    now: NaiveDateTime,
    window: usize,
) -> Result<String> {
    let config = detector.config();
    let info = detector.detect_sprint_for_date(date, now)?;
    let days_since = detector.days_since_anchor(date);
    let length_days = config.sprint_length_days();
    let index = info.sprint_number - 1;

    let mut out = String::new();
    out.push_str("Sprint Detection Report\n");
    out.push_str("═══════════════════════\n\n");

    out.push_str("Input\n");
    out.push_str("─────\n");
    out.push_str(&format!("Date:               {date} ({:?})\n", date.weekday()));
    out.push_str(&format!(
        "First sprint:       {} ({}-week sprints)\n",
        config.first_sprint_start_date, config.sprint_length_weeks
    ));
    out.push_str(&format!("Days since anchor:  {days_since}\n\n"));

    out.push_str("Resolved Sprint\n");
    out.push_str("───────────────\n");
    out.push_str(&format!(
        "Sprint {}: {} → {}\n",
        info.sprint_number, info.start_date, info.end_date
    ));
    out.push_str(&format!(
        "Working days:       {}\n",
        calendar::working_days_in(&info.range())
    ));
    let contains = super::validate_sprint_contains_date(&info, date);
    match contains.reason {
        None => out.push_str("Contains date:      yes\n\n"),
        Some(reason) => out.push_str(&format!("Contains date:      NO ({reason})\n\n")),
    }

    out.push_str("Boundaries\n");
    out.push_str("──────────\n");
    out.push_str(&format!(
        "index = floor({days_since} / {length_days}) = {index}\n"
    ));
    out.push_str(&format!(
        "start = {} + {index} × {length_days} days = {}\n",
        config.first_sprint_start_date, info.start_date
    ));
    out.push_str(&format!(
        "end   = start + {} days = {}\n\n",
        length_days - 1,
        info.end_date
    ));

    out.push_str(&format!("Status (as of {})\n", now.format("%Y-%m-%d %H:%M")));
    out.push_str("──────────────────────────────────\n");
    out.push_str(&format!("Current sprint:     {}\n", yes_no(info.is_current_for_date)));
    out.push_str(&format!("Active:             {}\n", yes_no(info.is_active)));
    out.push_str(&format!("Progress:           {}%\n", info.progress_percentage));
    out.push_str(&format!(
        "Remaining:          {} days ({} working)\n\n",
        info.days_remaining, info.working_days_remaining
    ));

    out.push_str("Expected Schedule\n");
    out.push_str("─────────────────\n");
    out.push_str(&render_schedule_rows(
        &detector.schedule_window(info.sprint_number, window)?,
        Some(info.sprint_number),
    ));
    Ok(out)
}

/// Schedule table; the row for `highlight` is marked with `▶`.
pub fn render_schedule_rows(rows: &[super::ScheduledSprint], highlight: Option<i64>) -> String {
    let mut out = String::new();
    out.push_str("  Sprint  Start       End         Working days\n");
    for row in rows {
        let marker = if highlight == Some(row.number) { "▶" } else { " " };
        out.push_str(&format!(
            "{marker} {:>6}  {}  {}  {:>12}\n",
            row.number, row.start, row.end, row.working_days
        ));
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PreAnchorPolicy, SprintConfig};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn report_has_all_sections() {
        let det = SprintDetector::new(SprintConfig::default()).unwrap();
        let now = d(2024, 9, 3).and_hms_opt(9, 0, 0).unwrap();
        let text = create_sprint_detection_report(&det, d(2024, 9, 3), now, 2).unwrap();
        for section in [
            "Sprint Detection Report",
            "Input",
            "Resolved Sprint",
            "Boundaries",
            "Status",
            "Expected Schedule",
        ] {
            assert!(text.contains(section), "missing section {section}");
        }
        assert!(text.contains("Sprint 18: 2024-09-01 → 2024-09-14"));
        assert!(text.contains("index = floor(240 / 14) = 17"));
        assert!(text.contains("Contains date:      yes"));
    }

    #[test]
    fn report_schedule_window_and_marker() {
        let det = SprintDetector::new(SprintConfig::default()).unwrap();
        let now = d(2024, 9, 3).and_hms_opt(9, 0, 0).unwrap();
        let text = create_sprint_detection_report(&det, d(2024, 9, 3), now, 2).unwrap();
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("  Sprint  Start"))
            .skip(1)
            .collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[2].starts_with("▶"));
        assert!(rows[2].contains("2024-09-01"));
    }

    #[test]
    fn report_window_respects_reject_policy() {
        let config = SprintConfig::default().with_policy(PreAnchorPolicy::Reject);
        let det = SprintDetector::new(config).unwrap();
        let now = d(2024, 1, 8).and_hms_opt(9, 0, 0).unwrap();
        let text = create_sprint_detection_report(&det, d(2024, 1, 8), now, 3).unwrap();
        assert!(text.contains("2024-01-07"));
        assert!(!text.contains("2023-"));
    }
}
