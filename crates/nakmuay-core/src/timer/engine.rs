//! Round timer state machine.
//!
//! The session does not own a clock thread: the caller delivers one `tick()`
//! per second while the session is active. Ticks that arrive while paused
//! are dropped.
//!
//! ## State Transitions
//!
//! ```text
//! Running -> Resting -> Running (next round) -> ... -> Complete
//!    \         /
//!     Paused <-
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = TimerSession::new(config);
//! session.start();
//! // Once per second:
//! if let Some(Event::SessionCompleted { record, .. }) = session.tick() {
//!     // hand `record` to the progress log
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::TimerConfig;
use crate::events::Event;
use crate::progress::SessionRecord;

/// Coarse phase derived from [`TimerState`], for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// No session exists.
    Idle,
    Running,
    Resting,
    Paused,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// 1-based; only exceeds `rounds` once the session has completed.
    pub current_round: u32,
    /// Seconds left in the current round or rest.
    pub time_remaining: u32,
    pub is_active: bool,
    pub is_resting: bool,
}

impl TimerState {
    fn fresh(config: &TimerConfig) -> Self {
        Self {
            current_round: 1,
            time_remaining: config.round_duration,
            is_active: false,
            is_resting: false,
        }
    }
}

/// One training session driven by whole-second ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    id: String,
    config: TimerConfig,
    state: TimerState,
    start_time: DateTime<Utc>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    /// Minutes, set on completion.
    #[serde(default)]
    total_duration: u64,
}

impl TimerSession {
    /// Create a session at round 1 with the full round ahead, not yet active.
    pub fn new(config: TimerConfig) -> Self {
        Self::new_at(config, Utc::now())
    }

    pub fn new_at(config: TimerConfig, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            state: TimerState::fresh(&config),
            start_time,
            end_time: None,
            total_duration: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn is_session_complete(&self) -> bool {
        self.state.current_round > self.config.rounds && !self.state.is_active
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_session_complete() {
            TimerPhase::Complete
        } else if !self.state.is_active {
            TimerPhase::Paused
        } else if self.state.is_resting {
            TimerPhase::Resting
        } else {
            TimerPhase::Running
        }
    }

    /// 0.0 .. 100.0 progress across all rounds and rests.
    ///
    /// A rest counts the full round before it as elapsed. Non-decreasing
    /// across ticks and exactly 100 once complete.
    pub fn session_progress(&self) -> f64 {
        let total = self.config.total_secs();
        if total == 0 {
            return 0.0;
        }
        let round = u64::from(self.config.round_duration);
        let rest = u64::from(self.config.rest_duration);
        let remaining = u64::from(self.state.time_remaining);

        let completed_rounds = u64::from(self.state.current_round.saturating_sub(1));
        let in_phase = if self.state.is_resting {
            round + rest.saturating_sub(remaining)
        } else {
            round.saturating_sub(remaining)
        };
        let elapsed = completed_rounds * self.config.cycle_secs() + in_phase;
        (elapsed as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            current_round: self.state.current_round,
            rounds: self.config.rounds,
            time_remaining: self.state.time_remaining,
            session_progress_pct: self.session_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. Returns `None` if already running or complete.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_active || self.is_session_complete() {
            return None;
        }
        let resumed = self.state != TimerState::fresh(&self.config);
        self.state.is_active = true;
        tracing::debug!(
            session = %self.id,
            round = self.state.current_round,
            resumed,
            "timer started"
        );
        Some(Event::SessionStarted {
            session_id: self.id.clone(),
            round: self.state.current_round,
            time_remaining: self.state.time_remaining,
            resumed,
            at: Utc::now(),
        })
    }

    /// Stop ticking, preserving the remaining time exactly.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_active {
            return None;
        }
        self.state.is_active = false;
        tracing::debug!(session = %self.id, remaining = self.state.time_remaining, "timer paused");
        Some(Event::SessionPaused {
            round: self.state.current_round,
            time_remaining: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    /// Back to round 1 with a new start time.
    pub fn reset(&mut self) -> Event {
        self.reset_at(Utc::now())
    }

    pub fn reset_at(&mut self, now: DateTime<Utc>) -> Event {
        self.state = TimerState::fresh(&self.config);
        self.start_time = now;
        self.end_time = None;
        self.total_duration = 0;
        tracing::debug!(session = %self.id, "timer reset");
        Event::SessionReset { at: now }
    }

    /// Advance one second. Returns an event on phase changes.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_active {
            return None;
        }
        let remaining = self.state.time_remaining.saturating_sub(1);
        if remaining == 0 {
            return Some(self.transition(now));
        }
        self.state.time_remaining = remaining;
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self, now: DateTime<Utc>) -> Event {
        if self.state.is_resting {
            let next = self.state.current_round + 1;
            if next > self.config.rounds {
                return self.complete(now);
            }
            self.state = TimerState {
                current_round: next,
                time_remaining: self.config.round_duration,
                is_active: true,
                is_resting: false,
            };
            tracing::debug!(session = %self.id, round = next, "round started");
            Event::RoundStarted {
                round: next,
                round_secs: self.config.round_duration,
                at: now,
            }
        } else {
            // A zero-length rest still takes one tick to pass through.
            self.state.time_remaining = self.config.rest_duration;
            self.state.is_resting = true;
            tracing::debug!(session = %self.id, round = self.state.current_round, "rest started");
            Event::RestStarted {
                round: self.state.current_round,
                rest_secs: self.config.rest_duration,
                at: now,
            }
        }
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Event {
        self.state = TimerState {
            current_round: self.config.rounds + 1,
            time_remaining: 0,
            is_active: false,
            is_resting: false,
        };
        self.end_time = Some(now);
        let elapsed_ms = (now - self.start_time).num_milliseconds().max(0);
        self.total_duration = (elapsed_ms as f64 / 60_000.0).round() as u64;
        tracing::info!(
            session = %self.id,
            rounds = self.config.rounds,
            minutes = self.total_duration,
            "session complete"
        );
        Event::SessionCompleted {
            record: SessionRecord::timer_completion(
                &self.id,
                now,
                self.total_duration,
                &self.config,
            ),
            at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config(rounds: u32, round: u32, rest: u32) -> TimerConfig {
        TimerConfig::new(rounds, round, rest, false).unwrap()
    }

    fn tick_n(session: &mut TimerSession, n: u32) -> Vec<Event> {
        (0..n).filter_map(|_| session.tick()).collect()
    }

    #[test]
    fn new_session_is_inactive_at_round_one() {
        let s = TimerSession::new(config(3, 180, 60));
        let st = s.state();
        assert_eq!(st.current_round, 1);
        assert_eq!(st.time_remaining, 180);
        assert!(!st.is_active);
        assert!(!st.is_resting);
        assert_eq!(s.phase(), TimerPhase::Paused);
        assert_eq!(s.session_progress(), 0.0);
    }

    #[test]
    fn two_round_scenario() {
        let mut s = TimerSession::new(config(2, 5, 2));
        assert!(s.start().is_some());

        tick_n(&mut s, 5);
        assert!(s.state().is_resting);
        assert_eq!(s.state().time_remaining, 2);

        tick_n(&mut s, 2);
        assert_eq!(s.state().current_round, 2);
        assert_eq!(s.state().time_remaining, 5);
        assert!(!s.state().is_resting);

        tick_n(&mut s, 5);
        assert!(s.state().is_resting);
        assert_eq!(s.state().time_remaining, 2);

        let events = tick_n(&mut s, 2);
        assert!(s.is_session_complete());
        let records: Vec<_> = events.iter().filter_map(Event::completed_record).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration, 0);
        assert_eq!(records[0].id, s.id());
        assert_eq!(s.session_progress(), 100.0);
        assert_eq!(s.phase(), TimerPhase::Complete);
    }

    #[test]
    fn ticks_while_paused_are_dropped() {
        let mut s = TimerSession::new(config(1, 10, 0));
        s.start();
        tick_n(&mut s, 3);
        s.pause();
        assert!(tick_n(&mut s, 20).is_empty());
        assert_eq!(s.state().time_remaining, 7);
        assert!(s.start().is_some());
        tick_n(&mut s, 1);
        assert_eq!(s.state().time_remaining, 6);
    }

    #[test]
    fn zero_rest_passes_through_one_tick() {
        let mut s = TimerSession::new(config(2, 3, 0));
        s.start();
        tick_n(&mut s, 3);
        assert!(s.state().is_resting);
        assert_eq!(s.state().time_remaining, 0);
        assert_eq!(s.state().current_round, 1);

        let ev = s.tick();
        assert!(matches!(ev, Some(Event::RoundStarted { round: 2, .. })));
        assert_eq!(s.state().time_remaining, 3);
    }

    #[test]
    fn completed_session_ignores_ticks_and_start() {
        let mut s = TimerSession::new(config(1, 1, 1));
        s.start();
        let events = tick_n(&mut s, 2);
        assert_eq!(events.iter().filter(|e| e.completed_record().is_some()).count(), 1);
        assert!(s.is_session_complete());

        assert!(s.start().is_none());
        assert!(tick_n(&mut s, 10).is_empty());
        assert_eq!(s.state().current_round, 2);
    }

    #[test]
    fn reset_returns_to_round_one_with_new_start() {
        let t0 = Utc::now() - Duration::minutes(5);
        let mut s = TimerSession::new_at(config(2, 4, 1), t0);
        s.start();
        tick_n(&mut s, 6);
        assert_eq!(s.state().current_round, 2);

        let later = t0 + Duration::minutes(3);
        s.reset_at(later);
        assert_eq!(s.state(), TimerState::fresh(s.config()));
        assert_eq!(s.start_time(), later);
        assert!(s.end_time().is_none());
    }

    #[test]
    fn start_twice_is_idempotent() {
        let mut s = TimerSession::new(config(1, 5, 0));
        assert!(s.start().is_some());
        assert!(s.start().is_none());
        assert!(s.is_active());
    }

    #[test]
    fn resume_is_flagged() {
        let mut s = TimerSession::new(config(1, 5, 0));
        match s.start() {
            Some(Event::SessionStarted { resumed, .. }) => assert!(!resumed),
            other => panic!("unexpected {other:?}"),
        }
        s.tick();
        s.pause();
        match s.start() {
            Some(Event::SessionStarted { resumed, time_remaining, .. }) => {
                assert!(resumed);
                assert_eq!(time_remaining, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn total_duration_rounds_to_minutes() {
        let start = Utc::now();
        let mut s = TimerSession::new_at(config(1, 1, 1), start);
        s.start();
        s.tick_at(start + Duration::seconds(30));
        s.tick_at(start + Duration::seconds(150));
        assert!(s.is_session_complete());
        assert_eq!(s.total_duration(), 3);
        assert_eq!(s.end_time(), Some(start + Duration::seconds(150)));
    }

    #[test]
    fn progress_counts_round_before_rest() {
        let mut s = TimerSession::new(config(2, 10, 10));
        s.start();
        tick_n(&mut s, 10);
        // Round one done, rest just started: 10 of 40 seconds.
        assert_eq!(s.session_progress(), 25.0);
        tick_n(&mut s, 5);
        assert_eq!(s.session_progress(), 37.5);
    }

    #[test]
    fn snapshot_reflects_state() {
        let s = TimerSession::new(config(3, 180, 60));
        match s.snapshot() {
            Event::StateSnapshot {
                phase,
                current_round,
                rounds,
                time_remaining,
                ..
            } => {
                assert_eq!(phase, TimerPhase::Paused);
                assert_eq!(current_round, 1);
                assert_eq!(rounds, 3);
                assert_eq!(time_remaining, 180);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn serde_roundtrip_preserves_state() {
        let mut s = TimerSession::new(config(2, 5, 2));
        s.start();
        tick_n(&mut s, 3);
        let json = serde_json::to_string(&s).unwrap();
        let back: TimerSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
