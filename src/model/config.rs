use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SprintError};

/// How dates earlier than the first sprint are resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreAnchorPolicy {
    /// Floor division: the sprint before sprint 1 is sprint 0, then -1, ...
    #[default]
    Extrapolate,
    /// Fail with `DateBeforeFirstSprint`.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprintConfig {
    pub first_sprint_start_date: NaiveDate,
    #[serde(default = "default_sprint_length_weeks")]
    pub sprint_length_weeks: u32,
    #[serde(default)]
    pub pre_anchor_policy: PreAnchorPolicy,
}

fn default_sprint_length_weeks() -> u32 {
    2
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            // A Sunday.
            first_sprint_start_date: NaiveDate::from_ymd_opt(2024, 1, 7)
                .unwrap_or(NaiveDate::MIN),
            sprint_length_weeks: default_sprint_length_weeks(),
            pre_anchor_policy: PreAnchorPolicy::Extrapolate,
        }
    }
}

impl SprintConfig {
    pub fn new(first_sprint_start_date: NaiveDate, sprint_length_weeks: u32) -> Result<Self> {
        let config = Self {
            first_sprint_start_date,
            sprint_length_weeks,
            pre_anchor_policy: PreAnchorPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_policy(mut self, policy: PreAnchorPolicy) -> Self {
        self.pre_anchor_policy = policy;
        self
    }

    /// The anchor must open a work week (Sunday) and sprints must be at
    /// least one week long.
    pub fn validate(&self) -> Result<()> {
        if self.sprint_length_weeks == 0 {
            return Err(SprintError::InvalidConfig(
                "sprint_length_weeks must be at least 1".into(),
            ));
        }
        if self.first_sprint_start_date.weekday() != Weekday::Sun {
            return Err(SprintError::InvalidConfig(format!(
                "first sprint start date {} is a {:?}, expected a Sunday",
                self.first_sprint_start_date,
                self.first_sprint_start_date.weekday()
            )));
        }
        Ok(())
    }

    pub fn sprint_length_days(&self) -> i64 {
        i64::from(self.sprint_length_weeks) * 7
    }
}
