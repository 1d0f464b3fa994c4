use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use super::streak::calculate_streak;
use crate::timer::TimerConfig;

/// Most recent records kept in the stored history.
pub const MAX_SESSION_HISTORY: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Combo,
    Timer,
    Mixed,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Combo => "combo",
            SessionType::Timer => "timer",
            SessionType::Mixed => "mixed",
        }
    }
}

/// One completed activity in the progress log. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Minutes.
    pub duration: u64,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl SessionRecord {
    pub fn new(
        id: impl Into<String>,
        date: DateTime<Utc>,
        session_type: SessionType,
        duration: u64,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            session_type,
            duration,
            details,
        }
    }

    /// Record emitted when a round-timer session completes.
    pub fn timer_completion(
        session_id: &str,
        ended_at: DateTime<Utc>,
        duration_min: u64,
        config: &TimerConfig,
    ) -> Self {
        Self::new(
            session_id,
            ended_at,
            SessionType::Timer,
            duration_min,
            json!({
                "rounds": config.rounds,
                "roundDuration": config.round_duration,
                "restDuration": config.rest_duration,
                "completed": true,
            }),
        )
    }

    /// Calendar day (UTC) the record counts toward.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Cumulative progress: a monotonic session counter plus a rolling log.
///
/// `total_sessions` keeps counting after `session_history` is trimmed to
/// [`MAX_SESSION_HISTORY`], so the two are only equal until the cap is hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub last_session_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_history: Vec<SessionRecord>,
}

impl UserProgress {
    /// Append a record and recompute streaks against `today`.
    pub fn record_session(&mut self, record: SessionRecord, today: NaiveDate) {
        self.last_session_date = Some(record.date);
        self.session_history.push(record);
        self.total_sessions += 1;
        self.refresh_streak(today);
    }

    /// Recompute `current_streak`; `longest_streak` never decreases.
    pub fn refresh_streak(&mut self, today: NaiveDate) {
        self.current_streak = calculate_streak(&self.session_history, today);
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    /// Copy with the history cut to the most recent records, oldest evicted first.
    pub fn trimmed(&self) -> Self {
        let skip = self
            .session_history
            .len()
            .saturating_sub(MAX_SESSION_HISTORY);
        Self {
            session_history: self.session_history[skip..].to_vec(),
            ..self.clone()
        }
    }

    /// Sum of recorded minutes over the retained history.
    pub fn total_duration(&self) -> u64 {
        total_duration(&self.session_history)
    }
}

pub fn total_duration(sessions: &[SessionRecord]) -> u64 {
    sessions.iter().map(|s| s.duration).sum()
}

/// Older exports wrote an empty string when no session had been recorded.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_on(id: &str, date: DateTime<Utc>) -> SessionRecord {
        SessionRecord::new(id, date, SessionType::Timer, 10, serde_json::Value::Null)
    }

    #[test]
    fn record_session_counts_and_updates_streak() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let today = now.date_naive();
        let mut progress = UserProgress::default();

        progress.record_session(record_on("a", now - Duration::days(1)), today);
        progress.record_session(record_on("b", now), today);

        assert_eq!(progress.total_sessions, 2);
        assert_eq!(progress.current_streak, 2);
        assert_eq!(progress.longest_streak, 2);
        assert_eq!(progress.last_session_date, Some(now));
    }

    #[test]
    fn longest_streak_survives_reset_of_current() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let mut progress = UserProgress::default();
        for d in 0..3 {
            let at = now + Duration::days(d);
            progress.record_session(record_on("x", at), at.date_naive());
        }
        assert_eq!(progress.longest_streak, 3);

        let later = now + Duration::days(10);
        progress.refresh_streak(later.date_naive());
        assert_eq!(progress.current_streak, 0);
        assert_eq!(progress.longest_streak, 3);
    }

    #[test]
    fn trimmed_keeps_last_thirty_and_total() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let mut progress = UserProgress::default();
        for i in 0..35 {
            progress.record_session(record_on(&i.to_string(), now), now.date_naive());
        }
        let trimmed = progress.trimmed();
        assert_eq!(trimmed.session_history.len(), MAX_SESSION_HISTORY);
        assert_eq!(trimmed.session_history[0].id, "5");
        assert_eq!(trimmed.total_sessions, 35);
    }

    #[test]
    fn timer_completion_details() {
        let now = Utc::now();
        let cfg = TimerConfig::new(2, 5, 2, false).unwrap();
        let rec = SessionRecord::timer_completion("s1", now, 0, &cfg);
        assert_eq!(rec.session_type, SessionType::Timer);
        assert_eq!(rec.details["rounds"], 2);
        assert_eq!(rec.details["restDuration"], 2);
        assert_eq!(rec.details["completed"], true);
    }

    #[test]
    fn deserializes_blank_last_session_date() {
        let json = r#"{"totalSessions":0,"currentStreak":0,"longestStreak":0,"lastSessionDate":"","sessionHistory":[]}"#;
        let progress: UserProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.last_session_date, None);
    }

    #[test]
    fn session_record_uses_type_key() {
        let rec = record_on("a", Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "timer");
        assert_eq!(json["date"], "2024-01-02T03:04:05Z");
    }
}
