use clap::Subcommand;
use nakmuay_core::Config;
use serde_json::json;

use super::{open_trainer, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Per-week totals, most recent first
    Weekly,
    /// Per-month totals, most recent first
    Monthly,
    /// Current and longest streak
    Streak,
    /// Achievement progress
    Milestones,
}

pub async fn run(action: StatsAction, config: &Config) -> CmdResult {
    let trainer = open_trainer(config)?;

    match action {
        StatsAction::Weekly => print_json(&trainer.weekly_stats().await)?,
        StatsAction::Monthly => print_json(&trainer.monthly_stats().await)?,
        StatsAction::Streak => {
            let progress = trainer.progress().await;
            print_json(&json!({
                "currentStreak": progress.current_streak,
                "longestStreak": progress.longest_streak,
                "lastSessionDate": progress.last_session_date,
            }))?;
        }
        StatsAction::Milestones => print_json(&trainer.milestones().await)?,
    }
    Ok(())
}
