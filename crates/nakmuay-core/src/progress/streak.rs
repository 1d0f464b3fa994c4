//! Consecutive-day training streak.
//!
//! A streak is anchored at today or yesterday: not having trained yet today
//! does not break it, but a full elapsed day without a session resets it to
//! zero.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::record::SessionRecord;

/// Current streak in days for `sessions`, evaluated on `today`.
///
/// Multiple sessions on one day count once. Pure: no I/O, no clock.
pub fn calculate_streak(sessions: &[SessionRecord], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(SessionRecord::day).collect();
    let mut newest_first = days.into_iter().rev();

    let Some(latest) = newest_first.next() else {
        return 0;
    };
    if latest != today && Some(latest) != today.pred_opt() {
        return 0;
    }

    let mut streak = 1;
    let mut expected = latest.pred_opt();
    for day in newest_first {
        if Some(day) != expected {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
    }
    streak
}
