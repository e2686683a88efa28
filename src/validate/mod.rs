use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::calendar::{self, HOURS_PER_WORKING_DAY, WORKING_DAYS_PER_WEEK};
use crate::capacity;
use crate::error::Result;
use crate::model::DateRange;

const HOURS_TOLERANCE: f64 = 0.01;
const LARGE_TEAM: u32 = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoursCheck {
    pub is_valid: bool,
    pub expected_hours: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkingDaysCheck {
    pub is_valid: bool,
    pub expected_days: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationDetails {
    pub team_size: u32,
    pub calendar_days: i64,
    pub working_days: i64,
    pub hours_per_day: f64,
    pub expected_potential: f64,
    pub claimed_potential: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SprintValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub details: ValidationDetails,
}

fn hours_match(a: f64, b: f64) -> bool {
    (a - b).abs() < HOURS_TOLERANCE
}

/// Check claimed hours against `team × weeks × 5 days × 7h`.
pub fn validate_hours_per_week(team_size: u32, sprint_weeks: u32, claimed_hours: f64) -> HoursCheck {
    let expected_hours = f64::from(team_size)
        * f64::from(sprint_weeks)
        * f64::from(WORKING_DAYS_PER_WEEK)
        * HOURS_PER_WORKING_DAY;

    if hours_match(expected_hours, claimed_hours) {
        HoursCheck {
            is_valid: true,
            expected_hours,
            message: format!(
                "[OK] {claimed_hours}h matches {team_size} members × {sprint_weeks} weeks × {WORKING_DAYS_PER_WEEK} days × {HOURS_PER_WORKING_DAY}h"
            ),
        }
    } else {
        HoursCheck {
            is_valid: false,
            expected_hours,
            message: format!(
                "[!!] claimed {claimed_hours}h, expected {expected_hours}h ({team_size} members × {sprint_weeks} weeks × {WORKING_DAYS_PER_WEEK} days × {HOURS_PER_WORKING_DAY}h)"
            ),
        }
    }
}

/// Check a claimed working-day count by recounting the range.
pub fn validate_working_days(start: NaiveDate, end: NaiveDate, claimed_days: i64) -> Result<WorkingDaysCheck> {
    let expected_days = calendar::count_working_days(start, end)?;
    let check = if expected_days == claimed_days {
        WorkingDaysCheck {
            is_valid: true,
            expected_days,
            message: format!("[OK] {start} → {end} has {expected_days} working days"),
        }
    } else {
        WorkingDaysCheck {
            is_valid: false,
            expected_days,
            message: format!(
                "[!!] claimed {claimed_days} working days, {start} → {end} has {expected_days}"
            ),
        }
    };
    Ok(check)
}

/// Recompute sprint potential and compare with the claimed figure. Warnings
/// flag unusual inputs and never affect `is_valid`.
pub fn validate_sprint_calculation(
    team_size: u32,
    start: NaiveDate,
    end: NaiveDate,
    claimed_potential: f64,
) -> Result<SprintValidation> {
    let range = DateRange::new(start, end)?;
    let working_days = calendar::working_days_in(&range);
    let expected_potential = capacity::potential_hours(team_size, working_days);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !hours_match(expected_potential, claimed_potential) {
        errors.push(format!(
            "[!!] potential hours mismatch: claimed {claimed_potential}h, expected {expected_potential}h ({team_size} members × {working_days} working days × {HOURS_PER_WORKING_DAY}h)"
        ));
    }

    // Whole-week spans are cross-checked against the per-week formula.
    if range.num_days() % 7 == 0 {
        let weeks = u32::try_from(range.num_days() / 7).unwrap_or(u32::MAX);
        let days_check = validate_working_days(start, end, i64::from(weeks) * i64::from(WORKING_DAYS_PER_WEEK))?;
        if !days_check.is_valid {
            errors.push(days_check.message);
        }
        let weekly = validate_hours_per_week(team_size, weeks, claimed_potential);
        if !weekly.is_valid && errors.is_empty() {
            errors.push(weekly.message);
        }
    }

    if team_size > LARGE_TEAM {
        warnings.push(format!(
            "team size {team_size} is unusually large (more than {LARGE_TEAM})"
        ));
    }
    if team_size == 0 {
        warnings.push("team size is 0; potential is always 0h".into());
    }
    if range.num_days() < 7 {
        warnings.push(format!(
            "sprint spans {} days, less than one week",
            range.num_days()
        ));
    }
    if working_days == 0 {
        warnings.push(format!("{start} → {end} contains no working days"));
    }

    let is_valid = errors.is_empty();
    if is_valid {
        debug!(team_size, %start, %end, claimed_potential, "sprint calculation valid");
    } else {
        warn!(team_size, %start, %end, claimed_potential, expected_potential, "sprint calculation mismatch");
    }
    for w in &warnings {
        warn!("{w}");
    }

    Ok(SprintValidation {
        is_valid,
        errors,
        warnings,
        details: ValidationDetails {
            team_size,
            calendar_days: range.num_days(),
            working_days,
            hours_per_day: HOURS_PER_WORKING_DAY,
            expected_potential,
            claimed_potential,
        },
    })
}

pub fn render_validation_text(result: &SprintValidation) -> String {
    let mut out = String::new();
    out.push_str("Sprint Calculation Check\n");
    out.push_str("────────────────────────\n");
    let d = &result.details;
    out.push_str(&format!("Team size:          {}\n", d.team_size));
    out.push_str(&format!(
        "Span:               {} days ({} working)\n",
        d.calendar_days, d.working_days
    ));
    out.push_str(&format!("Expected potential: {:.1}h\n", d.expected_potential));
    out.push_str(&format!("Claimed potential:  {:.1}h\n\n", d.claimed_potential));

    for e in &result.errors {
        out.push_str(&format!("  {e}\n"));
    }
    for w in &result.warnings {
        out.push_str(&format!("  [--] {w}\n"));
    }

    if result.is_valid {
        out.push_str("\nResult: valid\n");
    } else {
        out.push_str(&format!(
            "\nResult: invalid ({} error(s))\n",
            result.errors.len()
        ));
    }
    out
}
