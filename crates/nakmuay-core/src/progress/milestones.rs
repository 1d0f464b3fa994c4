use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::UserProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneType {
    Sessions,
    Streak,
    Duration,
}

/// Achievement view derived from [`UserProgress`]. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub achieved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_date: Option<DateTime<Utc>>,
    pub target: u64,
    pub current: u64,
    #[serde(rename = "type")]
    pub milestone_type: MilestoneType,
}

/// Ten hours, in minutes.
const TOTAL_DURATION_TARGET: u64 = 600;

/// Evaluate the fixed achievement set against `progress`.
pub fn milestones(progress: &UserProgress) -> Vec<Milestone> {
    let sessions = progress.total_sessions;
    let current_streak = u64::from(progress.current_streak);
    let longest_streak = u64::from(progress.longest_streak);
    let minutes = progress.total_duration();
    let nth_date = |n: usize| progress.session_history.get(n).map(|s| s.date);

    vec![
        Milestone {
            id: "first_session",
            title: "First Training",
            description: "Complete your first training session",
            achieved: sessions >= 1,
            achieved_date: (sessions >= 1).then(|| nth_date(0)).flatten(),
            target: 1,
            current: sessions,
            milestone_type: MilestoneType::Sessions,
        },
        Milestone {
            id: "ten_sessions",
            title: "Dedicated Fighter",
            description: "Complete 10 training sessions",
            achieved: sessions >= 10,
            achieved_date: (sessions >= 10).then(|| nth_date(9)).flatten(),
            target: 10,
            current: sessions,
            milestone_type: MilestoneType::Sessions,
        },
        Milestone {
            id: "fifty_sessions",
            title: "Nak Muay Warrior",
            description: "Complete 50 training sessions",
            achieved: sessions >= 50,
            achieved_date: None,
            target: 50,
            current: sessions,
            milestone_type: MilestoneType::Sessions,
        },
        Milestone {
            id: "first_streak",
            title: "Consistency Champion",
            description: "Maintain a 3-day training streak",
            achieved: current_streak >= 3 || longest_streak >= 3,
            achieved_date: None,
            target: 3,
            current: current_streak.max(longest_streak),
            milestone_type: MilestoneType::Streak,
        },
        Milestone {
            id: "week_streak",
            title: "Weekly Warrior",
            description: "Maintain a 7-day training streak",
            achieved: longest_streak >= 7,
            achieved_date: None,
            target: 7,
            current: longest_streak,
            milestone_type: MilestoneType::Streak,
        },
        Milestone {
            id: "total_duration",
            title: "Time Master",
            description: "Complete 10 hours of training",
            achieved: minutes >= TOTAL_DURATION_TARGET,
            achieved_date: None,
            target: TOTAL_DURATION_TARGET,
            current: minutes,
            milestone_type: MilestoneType::Duration,
        },
    ]
}

/// Short encouragement picked from the user's progress.
pub fn motivational_message(progress: &UserProgress) -> String {
    let streak = progress.current_streak;
    match progress.total_sessions {
        0 => "Ready to start your Muay Thai journey?".to_string(),
        _ if streak == 0 => "Time to get back on track! Every champion faces setbacks.".to_string(),
        _ if streak >= 7 => format!("Amazing {streak}-day streak! You're on fire!"),
        _ if streak >= 3 => format!("Great {streak}-day streak! Keep the momentum going!"),
        n if n >= 50 => "You're becoming a true Nak Muay! Keep training!".to_string(),
        n if n >= 10 => "You're showing real dedication! Keep it up!".to_string(),
        _ => "Great progress! Every session makes you stronger!".to_string(),
    }
}
