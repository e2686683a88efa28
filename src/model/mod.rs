mod config;
mod entry;
mod range;
mod sprint;

pub use config::{PreAnchorPolicy, SprintConfig};
pub use entry::{MemberDayEntry, ScheduleEntry};
pub use range::DateRange;
pub use sprint::{LegacySprintRecord, SprintInfo};
