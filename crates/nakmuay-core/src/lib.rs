//! # Nakmuay Core Library
//!
//! Core logic for a Muay Thai training companion. Every operation is
//! available through the standalone `nakmuay` CLI; any front end is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer**: A round/rest state machine advanced one second per `tick()`,
//!   driven by a tokio [`Ticker`] while a session is running
//! - **Progress**: Session log with streaks, weekly/monthly stats and milestones
//! - **Techniques**: Read-only catalog of strikes and combinations
//! - **Storage**: SQLite key-value persistence and TOML process configuration
//!
//! ## Key Components
//!
//! - [`Trainer`]: Application context that owns the session, store and bell
//! - [`TimerSession`]: Round timer state machine
//! - [`ProgressStore`]: Persistence gateway, implemented by [`Database`]
//! - [`Config`]: Process configuration management

pub mod audio;
pub mod error;
pub mod events;
pub mod progress;
pub mod storage;
pub mod techniques;
pub mod timer;
pub mod trainer;

pub use audio::{Bell, Chime, LogBell, SilentBell};
pub use error::{AudioError, ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use progress::{
    calculate_streak, Milestone, MonthlyStats, SessionRecord, SessionType, UserProgress,
    WeeklyStats,
};
pub use storage::{AppPreferences, BellKind, Config, Database, MemoryStore, ProgressStore};
pub use techniques::{Catalog, Category, Difficulty, Technique, TechniqueFilter};
pub use timer::{Ticker, TimerConfig, TimerConfigPatch, TimerPhase, TimerSession, TimerState};
pub use trainer::Trainer;
