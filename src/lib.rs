//! Sprint boundary detection and team capacity calculations.
//!
//! Sprints are fixed-length, contiguous windows counted from a configured
//! first-sprint start date. The work week runs Sunday through Thursday and
//! a working day is worth seven hours.

pub mod calendar;
pub mod capacity;
pub mod cli;
pub mod error;
pub mod model;
pub mod progress;
pub mod sprint;
pub mod storage;
pub mod validate;

pub use error::{Result, SprintError};
pub use model::{DateRange, LegacySprintRecord, ScheduleEntry, SprintConfig, SprintInfo};
pub use sprint::SprintDetector;
