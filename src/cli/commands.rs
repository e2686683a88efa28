use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

use crate::calendar;
use crate::capacity;
use crate::error::{Result, SprintError};
use crate::model::{DateRange, LegacySprintRecord, ScheduleEntry, SprintConfig};
use crate::progress::{self, HealthStatus, SprintHealth};
use crate::sprint::{self, SprintDetector};
use crate::storage::{self, Store};
use crate::validate;

#[derive(Parser, Debug)]
#[command(
    name = "sprintcap",
    version,
    about = "Sprint boundaries, team capacity and sprint health."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Directory holding .sprintcap/ (defaults to current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Override the first sprint start date (a Sunday, YYYY-MM-DD)
    #[arg(long, global = true)]
    pub anchor: Option<String>,

    /// Override the sprint length in weeks
    #[arg(long, global = true)]
    pub weeks: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .sprintcap/ with the sprint config and an empty entry list
    Init,

    /// Show the sprint containing a date
    Detect {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Reference time for progress fields (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Full diagnostic report for how a date resolves
    Report {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Sprints to list on each side of the resolved one
        #[arg(long, default_value = "3")]
        window: usize,
        /// Reference time for progress fields (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// List consecutive sprints
    Schedule {
        /// First sprint number to list (defaults to the current sprint)
        #[arg(long, allow_hyphen_values = true)]
        from: Option<i64>,
        /// Number of sprints to list
        #[arg(long, default_value = "6")]
        count: usize,
        /// Reference time for the current sprint (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Count working days (Sunday–Thursday) in a range
    Days {
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
        /// List every day with its classification
        #[arg(long)]
        list: bool,
    },

    /// Potential vs. planned hours for a range
    Capacity {
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
        /// Team size (defaults to distinct members with entries in range)
        #[arg(long)]
        team_size: Option<u32>,
        /// JSON file of member/day entries (defaults to .sprintcap/entries.json)
        #[arg(long)]
        entries: Option<PathBuf>,
    },

    /// Time progress, remaining days, on-track status and health
    Progress {
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
        /// Completion percentage
        #[arg(long)]
        completion: u32,
        /// Reference time (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Categorize sprint health
    Health {
        /// Completion percentage
        completion: u32,
        /// Elapsed time percentage
        time_progress: u8,
        /// Calendar days remaining
        days_remaining: i64,
    },

    /// Check a claimed sprint potential
    Validate {
        /// Team size
        team_size: u32,
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
        /// Claimed potential hours
        claimed_potential: f64,
    },

    /// Show the sprint containing a date in the legacy record shape
    Legacy {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Reference time for progress fields (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Health check
    Doctor,

    /// Show version
    Version,
}

/// Resolved per-invocation settings.
pub struct Context {
    pub store: Store,
    pub config: SprintConfig,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    pub fn detector(&self) -> Result<SprintDetector> {
        SprintDetector::new(self.config.clone())
    }
}

/// Stored config (or default) with command-line overrides applied.
pub fn resolve_config(store: &Store, anchor: Option<&str>, weeks: Option<u32>) -> Result<SprintConfig> {
    let mut config = store.load_config_or_default()?;
    if let Some(anchor) = anchor {
        config.first_sprint_start_date = calendar::parse_date(anchor)?;
    }
    if let Some(weeks) = weeks {
        config.sprint_length_weeks = weeks;
    }
    config.validate()?;
    Ok(config)
}

fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(s) => calendar::parse_datetime(s),
        None => Ok(Utc::now().naive_utc()),
    }
}

fn parse_range(start: &str, end: &str) -> Result<DateRange> {
    DateRange::new(calendar::parse_date(start)?, calendar::parse_date(end)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn colored_status(health: &SprintHealth) -> String {
    let label = health.status.as_str();
    match health.status {
        HealthStatus::Excellent => label.green().bold().to_string(),
        HealthStatus::Good => label.blue().bold().to_string(),
        HealthStatus::Warning => label.yellow().bold().to_string(),
        HealthStatus::Critical => label.red().bold().to_string(),
    }
}

// --- Command implementations ---

pub fn init(ctx: &Context) -> Result<()> {
    ctx.store.init(&ctx.config)?;
    if ctx.json {
        return print_json(&ctx.config);
    }
    println!("Initialized sprintcap in {}", ctx.store.data_dir().display());
    if !ctx.quiet {
        println!(
            "  first sprint {} ({}-week sprints)",
            ctx.config.first_sprint_start_date, ctx.config.sprint_length_weeks
        );
    }
    Ok(())
}

pub fn detect(ctx: &Context, date: &str, now: Option<&str>) -> Result<()> {
    let date = calendar::parse_date(date)?;
    let info = ctx.detector()?.detect_sprint_for_date(date, resolve_now(now)?)?;

    if ctx.json {
        return print_json(&info);
    }
    println!(
        "Sprint {} ({} → {})",
        info.sprint_number, info.start_date, info.end_date
    );
    if !ctx.quiet {
        println!("  length:     {} weeks", info.length_weeks);
        println!("  current:    {}", if info.is_current_for_date { "yes" } else { "no" });
        println!("  active:     {}", if info.is_active { "yes" } else { "no" });
        println!("  progress:   {}%", info.progress_percentage);
        println!(
            "  remaining:  {} days ({} working)",
            info.days_remaining, info.working_days_remaining
        );
    }
    Ok(())
}

pub fn report(ctx: &Context, date: &str, window: usize, now: Option<&str>) -> Result<()> {
    let date = calendar::parse_date(date)?;
    let detector = ctx.detector()?;
    let now = resolve_now(now)?;

    if ctx.json {
        let info = detector.detect_sprint_for_date(date, now)?;
        let schedule = detector.schedule_window(info.sprint_number, window)?;
        return print_json(&serde_json::json!({
            "date": date,
            "days_since_anchor": detector.days_since_anchor(date),
            "sprint": info,
            "schedule": schedule,
        }));
    }
    print!(
        "{}",
        sprint::create_sprint_detection_report(&detector, date, now, window)?
    );
    Ok(())
}

pub fn schedule(ctx: &Context, from: Option<i64>, count: usize, now: Option<&str>) -> Result<()> {
    let detector = ctx.detector()?;
    let today = resolve_now(now)?.date();
    let current = detector.sprint_number(today).ok();
    let from = match from {
        Some(n) => n,
        None => current.unwrap_or(1),
    };
    let rows = detector.schedule(from, count)?;

    if ctx.json {
        return print_json(&rows);
    }
    println!(
        "Sprint schedule ({}-week sprints from {})",
        detector.config().sprint_length_weeks,
        detector.anchor()
    );
    println!("──────────────────────────────────────────────");
    print!("{}", sprint::render_schedule_rows(&rows, current));
    Ok(())
}

pub fn days(ctx: &Context, start: &str, end: &str, list: bool) -> Result<()> {
    let range = parse_range(start, end)?;
    let days = calendar::classify(&range);
    let working = days.iter().filter(|d| d.is_working_day).count();

    if ctx.json {
        let listed = if list { Some(&days) } else { None };
        return print_json(&serde_json::json!({
            "start": range.start(),
            "end": range.end(),
            "calendar_days": range.num_days(),
            "working_days": working,
            "days": listed,
        }));
    }
    println!(
        "{working} working days in {} → {} ({} calendar days)",
        range.start(),
        range.end(),
        range.num_days()
    );
    if list {
        for day in &days {
            let kind = if day.is_working_day { "working" } else { "weekend" };
            println!("  {} {}  {kind}", day.date, day.date.format("%a"));
        }
    }
    Ok(())
}

pub fn capacity(
    ctx: &Context,
    start: &str,
    end: &str,
    team_size: Option<u32>,
    entries_path: Option<&PathBuf>,
) -> Result<()> {
    let range = parse_range(start, end)?;

    let all_entries = match entries_path {
        Some(path) => storage::load_entries_file(path)?,
        None if ctx.store.is_initialized() => ctx.store.load_entries()?,
        None => Vec::new(),
    };
    let in_range: Vec<_> = capacity::entries_in_range(&all_entries, &range)
        .into_iter()
        .cloned()
        .collect();
    let team_size = team_size.unwrap_or_else(|| capacity::team_size_from_entries(&in_range));
    let schedule_entries: Vec<ScheduleEntry> = in_range.iter().map(|e| e.entry()).collect();

    let metrics =
        capacity::calculate_sprint_metrics(team_size, range.start(), range.end(), &schedule_entries)?;
    let members = capacity::calculate_member_utilization(&in_range, range.start(), range.end())?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "start": range.start(),
            "end": range.end(),
            "metrics": metrics,
            "members": members,
        }));
    }
    print!("{}", capacity::render_capacity_text(&metrics, &members));
    Ok(())
}

#[derive(Debug, Serialize)]
struct ProgressReport {
    start: NaiveDate,
    end: NaiveDate,
    completion_percentage: u32,
    sprint_progress_percentage: u8,
    is_on_track: bool,
    days_remaining: i64,
    working_days_remaining: i64,
    health: SprintHealth,
}

pub fn progress(ctx: &Context, start: &str, end: &str, completion: u32, now: Option<&str>) -> Result<()> {
    let range = parse_range(start, end)?;
    let now = resolve_now(now)?;
    let today = now.date();

    let info = progress::calculate_sprint_progress_info(range.start(), range.end(), completion, now)?;
    let days_remaining = progress::calculate_days_remaining(range.end(), today);
    let health = progress::get_sprint_health_status(
        completion,
        info.sprint_progress_percentage,
        days_remaining,
    );
    let report = ProgressReport {
        start: range.start(),
        end: range.end(),
        completion_percentage: completion,
        sprint_progress_percentage: info.sprint_progress_percentage,
        is_on_track: info.is_on_track,
        days_remaining,
        working_days_remaining: progress::working_days_remaining_in(&range, today),
        health,
    };

    if ctx.json {
        return print_json(&report);
    }
    println!("Sprint Progress ({} → {})", report.start, report.end);
    println!("──────────────────────────────────");
    println!("Time elapsed:       {}%", report.sprint_progress_percentage);
    println!("Completion:         {}%", report.completion_percentage);
    println!(
        "On track:           {}",
        if report.is_on_track { "yes" } else { "no (behind)" }
    );
    println!(
        "Remaining:          {} days ({} working)",
        report.days_remaining, report.working_days_remaining
    );
    println!("Health:             {}", colored_status(&report.health));
    Ok(())
}

pub fn health(ctx: &Context, completion: u32, time_progress: u8, days_remaining: i64) -> Result<()> {
    if time_progress > 100 {
        return Err(SprintError::Other(format!(
            "time progress must be 0-100, got {time_progress}"
        )));
    }
    let health = progress::get_sprint_health_status(completion, time_progress, days_remaining);
    if ctx.json {
        return print_json(&health);
    }
    println!("{} ({})", colored_status(&health), health.color);
    Ok(())
}

pub fn validate(ctx: &Context, team_size: u32, start: &str, end: &str, claimed: f64) -> Result<()> {
    let range = parse_range(start, end)?;
    let result = validate::validate_sprint_calculation(team_size, range.start(), range.end(), claimed)?;

    if ctx.json {
        print_json(&result)?;
    } else {
        print!("{}", validate::render_validation_text(&result));
    }
    if !result.is_valid {
        return Err(SprintError::Other(format!(
            "validation failed with {} error(s)",
            result.errors.len()
        )));
    }
    Ok(())
}

pub fn legacy(ctx: &Context, date: &str, now: Option<&str>) -> Result<()> {
    let date = calendar::parse_date(date)?;
    let info = ctx.detector()?.detect_sprint_for_date(date, resolve_now(now)?)?;
    let record = LegacySprintRecord::from_sprint(&info);

    if ctx.json {
        return print_json(&record);
    }
    println!("id:                     {}", record.id);
    println!("current_sprint_number:  {}", record.current_sprint_number);
    println!("sprint_length_weeks:    {}", record.sprint_length_weeks);
    println!("sprint_start_date:      {}", record.sprint_start_date);
    println!("sprint_end_date:        {}", record.sprint_end_date);
    println!("progress_percentage:    {}", record.progress_percentage);
    println!("days_remaining:         {}", record.days_remaining);
    println!("working_days_remaining: {}", record.working_days_remaining);
    println!("is_active:              {}", record.is_active);
    Ok(())
}

pub fn doctor(store: &Store) -> Result<()> {
    println!("sprintcap doctor");
    println!("────────────────");

    if store.is_initialized() {
        println!("  [OK] .sprintcap/ directory found");
    } else {
        println!("  [--] .sprintcap/ not found (using built-in defaults)");
        let config = SprintConfig::default();
        println!(
            "       └─ first sprint {} ({}-week sprints)",
            config.first_sprint_start_date, config.sprint_length_weeks
        );
        return Ok(());
    }

    let mut issues = 0;
    match store.load_config() {
        Ok(config) => println!(
            "  [OK] config.json (first sprint {}, {}-week sprints, pre-anchor: {:?})",
            config.first_sprint_start_date, config.sprint_length_weeks, config.pre_anchor_policy
        ),
        Err(e) => {
            println!("  [!!] config.json: {e}");
            issues += 1;
        }
    }

    match store.load_entries() {
        Ok(entries) => {
            println!(
                "  [OK] entries.json ({} entries, {} members)",
                entries.len(),
                capacity::team_size_from_entries(&entries)
            );
            let negative = entries
                .iter()
                .filter(|e| e.hours.is_some_and(|h| h < 0.0))
                .count();
            if negative > 0 {
                println!("  [!!] {negative} entries with negative hours");
                issues += 1;
            }
        }
        Err(e) => {
            println!("  [!!] entries.json: {e}");
            issues += 1;
        }
    }

    if issues == 0 {
        println!("\nAll checks passed.");
    } else {
        println!("\n{issues} issue(s) found.");
    }
    Ok(())
}

pub fn version() -> Result<()> {
    println!("sprintcap {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

pub fn default_action() -> Result<()> {
    println!("sprintcap — sprint boundaries, team capacity and sprint health.");
    println!();
    println!("Run `sprintcap --help` for usage or `sprintcap detect <DATE>` to get started.");
    Ok(())
}
