mod config;
mod engine;
mod ticker;

pub use config::{TimerConfig, TimerConfigPatch};
pub use engine::{TimerPhase, TimerSession, TimerState};
pub use ticker::Ticker;

/// `MM:SS` for a countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `45m`, `2h` or `1h 30m`.
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    match (minutes / 60, minutes % 60) {
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
