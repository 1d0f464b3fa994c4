//! Progress tracking: the session log, streaks and derived statistics.
//!
//! Everything here is a pure projection of [`UserProgress`]; persistence
//! lives in [`crate::storage`] and the glue in [`crate::trainer`].

mod milestones;
mod record;
mod stats;
mod streak;

pub use milestones::{milestones, motivational_message, Milestone, MilestoneType};
pub use record::{total_duration, SessionRecord, SessionType, UserProgress, MAX_SESSION_HISTORY};
pub use stats::{month_key, monthly_stats, week_start, weekly_stats, MonthlyStats, WeeklyStats};
pub use streak::calculate_streak;
