use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::SessionRecord;
use crate::timer::TimerPhase;

/// Every timer state change produces an Event.
/// The front end renders them; the trainer routes bells and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        session_id: String,
        round: u32,
        time_remaining: u32,
        resumed: bool,
        at: DateTime<Utc>,
    },
    SessionPaused {
        round: u32,
        time_remaining: u32,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A round ended and the rest interval began.
    RestStarted {
        round: u32,
        rest_secs: u32,
        at: DateTime<Utc>,
    },
    RoundStarted {
        round: u32,
        round_secs: u32,
        at: DateTime<Utc>,
    },
    /// Emitted exactly once per session, carrying its log entry.
    SessionCompleted {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        current_round: u32,
        rounds: u32,
        time_remaining: u32,
        session_progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether the bell should sound for this event when the session has it enabled.
    pub fn is_bell_cue(&self) -> bool {
        matches!(
            self,
            Event::SessionStarted { .. }
                | Event::RestStarted { .. }
                | Event::RoundStarted { .. }
                | Event::SessionCompleted { .. }
        )
    }

    pub fn completed_record(&self) -> Option<&SessionRecord> {
        match self {
            Event::SessionCompleted { record, .. } => Some(record),
            _ => None,
        }
    }
}
