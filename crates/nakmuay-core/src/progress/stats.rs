//! Weekly and monthly aggregates over the session log.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::SessionRecord;

/// Aggregate for one Sunday-anchored week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// Sunday the week starts on.
    pub week: NaiveDate,
    pub total_sessions: u64,
    /// Minutes.
    pub total_duration: u64,
    /// Minutes, rounded.
    pub average_session_length: u64,
}

/// Aggregate for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// `YYYY-MM`.
    pub month: String,
    pub total_sessions: u64,
    pub total_duration: u64,
    pub average_session_length: u64,
    /// Distinct days in the month with at least one session.
    pub streak_days: u64,
}

/// Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

pub fn month_key(day: NaiveDate) -> String {
    format!("{:04}-{:02}", day.year(), day.month())
}

/// Per-week totals, most recent week first.
pub fn weekly_stats(sessions: &[SessionRecord]) -> Vec<WeeklyStats> {
    let mut weeks: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for s in sessions {
        let entry = weeks.entry(week_start(s.day())).or_default();
        entry.0 += 1;
        entry.1 += s.duration;
    }

    weeks
        .into_iter()
        .rev()
        .map(|(week, (count, minutes))| WeeklyStats {
            week,
            total_sessions: count,
            total_duration: minutes,
            average_session_length: rounded_average(minutes, count),
        })
        .collect()
}

/// Per-month totals, most recent month first.
pub fn monthly_stats(sessions: &[SessionRecord]) -> Vec<MonthlyStats> {
    #[derive(Default)]
    struct Bucket {
        count: u64,
        minutes: u64,
        days: BTreeSet<NaiveDate>,
    }

    let mut months: BTreeMap<String, Bucket> = BTreeMap::new();
    for s in sessions {
        let day = s.day();
        let bucket = months.entry(month_key(day)).or_default();
        bucket.count += 1;
        bucket.minutes += s.duration;
        bucket.days.insert(day);
    }

    // Zero-padded keys sort chronologically.
    months
        .into_iter()
        .rev()
        .map(|(month, b)| MonthlyStats {
            month,
            total_sessions: b.count,
            total_duration: b.minutes,
            average_session_length: rounded_average(b.minutes, b.count),
            streak_days: b.days.len() as u64,
        })
        .collect()
}

fn rounded_average(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SessionType;
    use chrono::{TimeZone, Utc};

    fn rec(y: i32, m: u32, d: u32, minutes: u64) -> SessionRecord {
        SessionRecord::new(
            format!("{y}-{m}-{d}"),
            Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
            SessionType::Timer,
            minutes,
            serde_json::Value::Null,
        )
    }

    #[test]
    fn week_start_is_sunday() {
        // 2024-05-15 is a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        let sun = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert_eq!(week_start(sun), sun);
        let sat = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        assert_eq!(week_start(sat), sun);
    }

    #[test]
    fn weekly_groups_and_orders_newest_first() {
        let sessions = vec![
            rec(2024, 5, 6, 10),  // week of 5th
            rec(2024, 5, 13, 12), // week of 12th
            rec(2024, 5, 15, 15), // week of 12th
        ];
        let stats = weekly_stats(&sessions);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].week, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(stats[0].total_sessions, 2);
        assert_eq!(stats[0].total_duration, 27);
        assert_eq!(stats[0].average_session_length, 14);
        assert_eq!(stats[1].week, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        assert_eq!(stats[1].average_session_length, 10);
    }

    #[test]
    fn weekly_spans_month_boundary() {
        // 2024-06-01 is a Saturday, so it belongs to the week of May 26th.
        let stats = weekly_stats(&[rec(2024, 5, 27, 5), rec(2024, 6, 1, 5)]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].week, NaiveDate::from_ymd_opt(2024, 5, 26).unwrap());
    }

    #[test]
    fn monthly_counts_distinct_training_days() {
        let sessions = vec![
            rec(2024, 4, 30, 20),
            rec(2024, 5, 1, 10),
            rec(2024, 5, 1, 20),
            rec(2024, 5, 3, 5),
        ];
        let stats = monthly_stats(&sessions);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].month, "2024-05");
        assert_eq!(stats[0].total_sessions, 3);
        assert_eq!(stats[0].total_duration, 35);
        assert_eq!(stats[0].average_session_length, 12);
        assert_eq!(stats[0].streak_days, 2);
        assert_eq!(stats[1].month, "2024-04");
        assert_eq!(stats[1].streak_days, 1);
    }

    #[test]
    fn monthly_orders_across_years() {
        let stats = monthly_stats(&[rec(2023, 12, 31, 1), rec(2024, 1, 1, 1)]);
        let months: Vec<_> = stats.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2023-12"]);
    }

    #[test]
    fn empty_log_has_no_buckets() {
        assert!(weekly_stats(&[]).is_empty());
        assert!(monthly_stats(&[]).is_empty());
    }
}
