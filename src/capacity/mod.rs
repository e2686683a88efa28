use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::calendar::{self, HOURS_PER_WORKING_DAY};
use crate::error::Result;
use crate::model::{DateRange, MemberDayEntry, ScheduleEntry};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CapacityMetrics {
    pub team_size: u32,
    pub working_days: i64,
    pub potential_hours: f64,
    pub actual_planned_hours: f64,
    pub completion_percentage: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberUtilization {
    pub member: String,
    pub planned_hours: f64,
    pub potential_hours: f64,
    pub utilization_percentage: u32,
}

/// `team_size × working days × 7h` over an inclusive date range.
pub fn calculate_sprint_potential(team_size: u32, start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let working_days = calendar::count_working_days(start, end)?;
    Ok(potential_hours(team_size, working_days))
}

pub fn potential_hours(team_size: u32, working_days: i64) -> f64 {
    f64::from(team_size) * working_days as f64 * HOURS_PER_WORKING_DAY
}

/// Sum of recorded hours; entries without hours count as zero.
pub fn calculate_actual_planned_hours(entries: &[ScheduleEntry]) -> f64 {
    entries.iter().filter_map(|e| e.hours).sum()
}

/// `round(actual / potential × 100)`, or 0 when there is no potential.
/// Over-commitment is reported as-is, above 100.
pub fn calculate_completion_percentage(actual: f64, potential: f64) -> u32 {
    if potential <= 0.0 {
        return 0;
    }
    (actual / potential * 100.0).round().max(0.0) as u32
}

pub fn calculate_sprint_metrics(
    team_size: u32,
    start: NaiveDate,
    end: NaiveDate,
    entries: &[ScheduleEntry],
) -> Result<CapacityMetrics> {
    let working_days = calendar::count_working_days(start, end)?;
    let potential = potential_hours(team_size, working_days);
    let actual = calculate_actual_planned_hours(entries);

    let metrics = CapacityMetrics {
        team_size,
        working_days,
        potential_hours: potential,
        actual_planned_hours: actual,
        completion_percentage: calculate_completion_percentage(actual, potential),
    };
    debug!(
        team_size,
        working_days,
        potential_hours = potential,
        actual_planned_hours = actual,
        completion = metrics.completion_percentage,
        "sprint metrics"
    );
    Ok(metrics)
}

// ─── Member-keyed entries ────────────────────────────────────

pub fn entries_in_range<'a>(entries: &'a [MemberDayEntry], range: &DateRange) -> Vec<&'a MemberDayEntry> {
    entries.iter().filter(|e| range.contains(e.date)).collect()
}

pub fn team_size_from_entries(entries: &[MemberDayEntry]) -> u32 {
    let members: BTreeSet<&str> = entries.iter().map(|e| e.member.as_str()).collect();
    u32::try_from(members.len()).unwrap_or(u32::MAX)
}

/// Planned vs. potential hours per member within `start..=end`, sorted by
/// member name. Entries outside the range are ignored.
pub fn calculate_member_utilization(
    entries: &[MemberDayEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MemberUtilization>> {
    let range = DateRange::new(start, end)?;
    let member_potential = potential_hours(1, calendar::working_days_in(&range));

    let mut planned: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries_in_range(entries, &range) {
        *planned.entry(entry.member.as_str()).or_default() += entry.hours.unwrap_or(0.0);
    }

    Ok(planned
        .into_iter()
        .map(|(member, hours)| MemberUtilization {
            member: member.to_string(),
            planned_hours: hours,
            potential_hours: member_potential,
            utilization_percentage: calculate_completion_percentage(hours, member_potential),
        })
        .collect())
}

pub fn render_capacity_text(metrics: &CapacityMetrics, members: &[MemberUtilization]) -> String {
    let mut out = String::new();
    out.push_str("Sprint Capacity\n");
    out.push_str("───────────────\n");
    out.push_str(&format!("Team size:          {}\n", metrics.team_size));
    out.push_str(&format!("Working days:       {}\n", metrics.working_days));
    out.push_str(&format!("Potential hours:    {:.1}\n", metrics.potential_hours));
    out.push_str(&format!("Planned hours:      {:.1}\n", metrics.actual_planned_hours));
    out.push_str(&format!("Completion:         {}%\n", metrics.completion_percentage));

    if !members.is_empty() {
        out.push_str("\nMember        Planned  Potential  Utilization\n");
        for m in members {
            let name = if m.member.chars().count() > 12 {
                m.member.chars().take(12).collect::<String>()
            } else {
                m.member.clone()
            };
            out.push_str(&format!(
                "{:<12}  {:>7.1}  {:>9.1}  {:>10}%\n",
                name, m.planned_hours, m.potential_hours, m.utilization_percentage
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(member: &str, date: NaiveDate, hours: Option<f64>) -> MemberDayEntry {
        MemberDayEntry {
            member: member.into(),
            date,
            hours,
        }
    }

    #[test]
    fn potential_for_five_people() {
        assert_eq!(calculate_sprint_potential(5, d(2024, 1, 7), d(2024, 1, 18)).unwrap(), 350.0);
    }

    #[test]
    fn potential_for_eight_people() {
        assert_eq!(calculate_sprint_potential(8, d(2024, 1, 7), d(2024, 1, 18)).unwrap(), 560.0);
    }

    #[test]
    fn potential_of_empty_team_is_zero() {
        assert_eq!(calculate_sprint_potential(0, d(2024, 1, 7), d(2024, 1, 18)).unwrap(), 0.0);
    }

    #[test]
    fn potential_rejects_reversed_range() {
        assert!(calculate_sprint_potential(5, d(2024, 1, 18), d(2024, 1, 7)).is_err());
    }

    #[test]
    fn planned_hours_treat_missing_as_zero() {
        let entries = [
            ScheduleEntry::new(Some(7.0)),
            ScheduleEntry::new(Some(3.5)),
            ScheduleEntry::new(Some(0.0)),
            ScheduleEntry::new(Some(7.0)),
            ScheduleEntry::new(None),
        ];
        assert_eq!(calculate_actual_planned_hours(&entries), 17.5);
        assert_eq!(calculate_actual_planned_hours(&[]), 0.0);
    }

    #[test]
    fn completion_percentage_cases() {
        assert_eq!(calculate_completion_percentage(280.0, 350.0), 80);
        assert_eq!(calculate_completion_percentage(100.0, 0.0), 0);
        assert_eq!(calculate_completion_percentage(400.0, 350.0), 114);
        assert_eq!(calculate_completion_percentage(0.0, 350.0), 0);
    }

    #[test]
    fn completion_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(calculate_completion_percentage(1.0, 8.0), 13);
        // 3.5 / 280 = 1.25%
        assert_eq!(calculate_completion_percentage(3.5, 280.0), 1);
    }

    #[test]
    fn metrics_compose() {
        let entries = vec![ScheduleEntry::new(Some(7.0)); 40];
        let metrics = calculate_sprint_metrics(5, d(2024, 1, 7), d(2024, 1, 18), &entries).unwrap();
        assert_eq!(metrics.team_size, 5);
        assert_eq!(metrics.working_days, 10);
        assert_eq!(metrics.potential_hours, 350.0);
        assert_eq!(metrics.actual_planned_hours, 280.0);
        assert_eq!(metrics.completion_percentage, 80);
    }

    #[test]
    fn metrics_for_weekend_only_range() {
        let metrics = calculate_sprint_metrics(
            4,
            d(2024, 1, 12),
            d(2024, 1, 13),
            &[ScheduleEntry::new(Some(2.0))],
        )
        .unwrap();
        assert_eq!(metrics.potential_hours, 0.0);
        assert_eq!(metrics.completion_percentage, 0);
    }

    #[test]
    fn team_size_counts_distinct_members() {
        let entries = vec![
            entry("ana", d(2024, 1, 7), Some(7.0)),
            entry("ana", d(2024, 1, 8), Some(7.0)),
            entry("ben", d(2024, 1, 7), None),
        ];
        assert_eq!(team_size_from_entries(&entries), 2);
        assert_eq!(team_size_from_entries(&[]), 0);
    }

    #[test]
    fn member_utilization_filters_and_sorts() {
        let entries = vec![
            entry("ben", d(2024, 1, 7), Some(7.0)),
            entry("ana", d(2024, 1, 7), Some(7.0)),
            entry("ana", d(2024, 1, 8), Some(3.5)),
            entry("ana", d(2024, 1, 30), Some(7.0)),
            entry("cy", d(2024, 1, 9), None),
        ];
        let rows = calculate_member_utilization(&entries, d(2024, 1, 7), d(2024, 1, 11)).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.member.as_str()).collect();
        assert_eq!(names, vec!["ana", "ben", "cy"]);
        assert_eq!(rows[0].planned_hours, 10.5);
        assert_eq!(rows[0].potential_hours, 35.0);
        assert_eq!(rows[0].utilization_percentage, 30);
        assert_eq!(rows[2].planned_hours, 0.0);
    }

    #[test]
    fn render_capacity_includes_members() {
        let metrics = calculate_sprint_metrics(1, d(2024, 1, 7), d(2024, 1, 11), &[]).unwrap();
        let members = vec![MemberUtilization {
            member: "ana".into(),
            planned_hours: 14.0,
            potential_hours: 35.0,
            utilization_percentage: 40,
        }];
        let text = render_capacity_text(&metrics, &members);
        assert!(text.contains("Sprint Capacity"));
        assert!(text.contains("Potential hours:    35.0"));
        assert!(text.contains("ana"));
        assert!(text.contains("40%"));
    }
}
