//! Process-wide trainer context.
//!
//! [`Trainer`] owns the store, the bell, the technique catalog and the one
//! active timer session. It is the only place that joins timer completion
//! to the progress log: the session hands back a [`SessionRecord`] in its
//! completion event and the trainer appends it, recomputes streaks and
//! persists, all while holding the session lock so a later reset cannot
//! interleave with the write.

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch, Mutex};

use crate::audio::{Bell, Chime};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::progress::{
    milestones, monthly_stats, motivational_message, weekly_stats, Milestone, MonthlyStats,
    SessionRecord, UserProgress, WeeklyStats,
};
use crate::storage::{AppPreferences, ProgressStore};
use crate::techniques::Catalog;
use crate::timer::{Ticker, TimerConfig, TimerConfigPatch, TimerPhase, TimerSession};

const EVENT_CHANNEL_CAPACITY: usize = 64;

struct State<S> {
    store: S,
    progress: UserProgress,
    timer_config: TimerConfig,
    preferences: AppPreferences,
    session: Option<TimerSession>,
    ticker: Ticker,
    /// Bumped whenever the ticker is replaced; stale tick tasks bail out.
    generation: u64,
    last_error: Option<String>,
}

impl<S: ProgressStore> State<S> {
    fn stop_ticker(&mut self) {
        self.ticker.cancel();
        self.generation += 1;
    }

    /// Append, recompute streaks and persist. On a failed write the
    /// in-memory progress falls back to what the store holds.
    fn apply_record(&mut self, record: SessionRecord) -> Result<()> {
        let previous = self.progress.clone();
        self.progress.record_session(record, Utc::now().date_naive());
        self.persist_progress(previous)
    }

    fn persist_progress(&mut self, previous: UserProgress) -> Result<()> {
        match self.store.save_progress(&self.progress) {
            Ok(()) => {
                self.progress = self.progress.trimmed();
                tracing::info!(
                    total = self.progress.total_sessions,
                    streak = self.progress.current_streak,
                    "progress saved"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save progress");
                self.progress = self.store.load_progress().unwrap_or(previous);
                self.progress.refresh_streak(Utc::now().date_naive());
                Err(e)
            }
        }
    }

    /// Replace in-memory progress, timer settings and preferences with
    /// what the store holds.
    fn reload(&mut self) -> Result<()> {
        self.progress = self.store.load_progress()?;
        self.progress.refresh_streak(Utc::now().date_naive());
        self.timer_config = self.store.load_timer_config()?;
        self.preferences = self.store.load_preferences()?;
        Ok(())
    }
}

struct Shared<S> {
    state: Mutex<State<S>>,
    chime: Chime,
    catalog: Catalog,
    events: broadcast::Sender<Event>,
    /// True while a ticker is driving the session.
    running: watch::Sender<bool>,
}

impl<S: ProgressStore + 'static> Shared<S> {
    fn publish(&self, event: &Event) {
        // No subscribers is fine.
        let _ = self.events.send(event.clone());
    }

    fn cue(&self, session: &TimerSession, event: &Event) {
        if session.config().bell_enabled && event.is_bell_cue() {
            self.chime.play();
        }
    }

    async fn on_tick(&self, generation: u64) -> ControlFlow<()> {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return ControlFlow::Break(());
        }
        let Some(session) = state.session.as_mut() else {
            self.running.send_replace(false);
            return ControlFlow::Break(());
        };

        let Some(event) = session.tick() else {
            if session.is_active() {
                return ControlFlow::Continue(());
            }
            self.running.send_replace(false);
            return ControlFlow::Break(());
        };
        self.cue(session, &event);
        let record = event.completed_record().cloned();
        self.publish(&event);

        match record {
            Some(record) => {
                if let Err(e) = state.apply_record(record) {
                    state.last_error = Some(e.to_string());
                }
                self.running.send_replace(false);
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        }
    }
}

/// Explicit application context: create one per process and share it.
pub struct Trainer<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Trainer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: ProgressStore + 'static> Trainer<S> {
    /// Load persisted state and build the context with the bundled catalog.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: S, bell: Arc<dyn Bell>) -> Result<Self> {
        Self::with_catalog(store, bell, Catalog::bundled()?)
    }

    pub fn with_catalog(store: S, bell: Arc<dyn Bell>, catalog: Catalog) -> Result<Self> {
        let mut progress = store.load_progress()?;
        let timer_config = store.load_timer_config()?;
        let preferences = store.load_preferences()?;
        // The stored streak may predate days without training.
        progress.refresh_streak(Utc::now().date_naive());

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (running, _) = watch::channel(false);
        let chime = Chime::new(bell, preferences.sound_enabled);
        let state = State {
            store,
            progress,
            timer_config,
            preferences,
            session: None,
            ticker: Ticker::stopped(),
            generation: 0,
            last_error: None,
        };
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                chime,
                catalog,
                events,
                running,
            }),
        })
    }

    /// Receive every timer event from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn progress(&self) -> UserProgress {
        self.shared.state.lock().await.progress.clone()
    }

    pub async fn timer_config(&self) -> TimerConfig {
        self.shared.state.lock().await.timer_config
    }

    pub async fn preferences(&self) -> AppPreferences {
        self.shared.state.lock().await.preferences.clone()
    }

    pub async fn session(&self) -> Option<TimerSession> {
        self.shared.state.lock().await.session.clone()
    }

    pub async fn is_ticking(&self) -> bool {
        self.shared.state.lock().await.ticker.is_running()
    }

    /// Resolve once no session is running: completed, paused, reset or stopped.
    /// Returns immediately when idle. A completed session's record has been
    /// handled by the time this returns.
    pub async fn wait_idle(&self) {
        let mut running = self.shared.running.subscribe();
        // The sender lives as long as `self`.
        let _ = running.wait_for(|r| !*r).await;
    }

    /// Current timer state, or an idle snapshot when no session exists.
    pub async fn snapshot(&self) -> Event {
        let state = self.shared.state.lock().await;
        match &state.session {
            Some(session) => session.snapshot(),
            None => Event::StateSnapshot {
                phase: TimerPhase::Idle,
                current_round: 0,
                rounds: state.timer_config.rounds,
                time_remaining: state.timer_config.round_duration,
                session_progress_pct: 0.0,
                at: Utc::now(),
            },
        }
    }

    /// Error from the last background write, if any. Clears it.
    pub async fn take_last_error(&self) -> Option<String> {
        self.shared.state.lock().await.last_error.take()
    }

    pub async fn weekly_stats(&self) -> Vec<WeeklyStats> {
        weekly_stats(&self.shared.state.lock().await.progress.session_history)
    }

    pub async fn monthly_stats(&self) -> Vec<MonthlyStats> {
        monthly_stats(&self.shared.state.lock().await.progress.session_history)
    }

    pub async fn milestones(&self) -> Vec<Milestone> {
        milestones(&self.shared.state.lock().await.progress)
    }

    pub async fn motivational_message(&self) -> String {
        motivational_message(&self.shared.state.lock().await.progress)
    }

    // ── Timer control ────────────────────────────────────────────────

    /// Start a new session from the saved config, or resume the current one.
    /// A completed session is replaced by a fresh one.
    pub async fn start_session(&self) -> Option<Event> {
        self.start(None).await
    }

    /// Like [`Trainer::start_session`], but a new session uses `config`
    /// instead of the saved settings. A paused session resumes unchanged.
    pub async fn start_session_with(&self, config: TimerConfig) -> Option<Event> {
        self.start(Some(config)).await
    }

    async fn start(&self, config: Option<TimerConfig>) -> Option<Event> {
        let mut state = self.shared.state.lock().await;
        if state.session.as_ref().is_some_and(TimerSession::is_session_complete) {
            state.session = None;
        }
        let config = config.unwrap_or(state.timer_config);
        let session = state.session.get_or_insert_with(|| TimerSession::new(config));
        let event = session.start()?;
        self.shared.cue(session, &event);
        self.shared.publish(&event);

        state.stop_ticker();
        let generation = state.generation;
        let shared = Arc::clone(&self.shared);
        state.ticker = Ticker::spawn(Ticker::PERIOD, move || {
            let shared = Arc::clone(&shared);
            async move { shared.on_tick(generation).await }
        });
        self.shared.running.send_replace(true);
        Some(event)
    }

    pub async fn pause_session(&self) -> Option<Event> {
        let mut state = self.shared.state.lock().await;
        state.stop_ticker();
        self.shared.running.send_replace(false);
        let event = state.session.as_mut()?.pause()?;
        self.shared.publish(&event);
        Some(event)
    }

    pub async fn reset_session(&self) -> Option<Event> {
        let mut state = self.shared.state.lock().await;
        state.stop_ticker();
        self.shared.running.send_replace(false);
        let event = state.session.as_mut()?.reset();
        self.shared.publish(&event);
        Some(event)
    }

    /// Discard the current session without recording it.
    pub async fn stop_session(&self) {
        let mut state = self.shared.state.lock().await;
        state.stop_ticker();
        self.shared.running.send_replace(false);
        if let Some(session) = state.session.take() {
            tracing::debug!(session = %session.id(), "session discarded");
        }
    }

    // ── Progress ─────────────────────────────────────────────────────

    /// Append a record, update streaks and persist.
    ///
    /// # Errors
    /// Returns the store error; in-memory progress reverts to the stored copy.
    pub async fn record_session(&self, record: SessionRecord) -> Result<UserProgress> {
        let mut state = self.shared.state.lock().await;
        state.apply_record(record)?;
        Ok(state.progress.clone())
    }

    /// Record practice of a catalog technique.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] for an unknown id, or a store error.
    pub async fn complete_technique(&self, id: &str) -> Result<SessionRecord> {
        let record = self.shared.catalog.completion_record(id, Utc::now())?;
        self.record_session(record.clone()).await?;
        Ok(record)
    }

    pub async fn reset_progress(&self) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        let previous = std::mem::take(&mut state.progress);
        state.persist_progress(previous)
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Merge and save timer settings. Not allowed while a session is underway.
    pub async fn update_timer_config(&self, patch: TimerConfigPatch) -> Result<TimerConfig> {
        let mut state = self.shared.state.lock().await;
        if state
            .session
            .as_ref()
            .is_some_and(|s| !s.is_session_complete())
        {
            return Err(CoreError::SessionInProgress);
        }
        let config = state.timer_config.merged(&patch)?;
        state.store.save_timer_config(&config)?;
        state.timer_config = config;
        Ok(config)
    }

    pub async fn update_preferences(&self, preferences: AppPreferences) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        state.store.save_preferences(&preferences)?;
        self.shared.chime.set_sound_enabled(preferences.sound_enabled);
        state.preferences = preferences;
        Ok(())
    }

    pub async fn export_data(&self) -> Result<String> {
        self.shared.state.lock().await.store.export_data()
    }

    /// Import a bundle, then reload in-memory state from the store whether
    /// or not the import succeeded.
    pub async fn import_data(&self, data: &str) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        let imported = state.store.import_data(data);
        if let Err(e) = &imported {
            tracing::error!(error = %e, "import failed");
        }
        state.reload()?;
        self.shared
            .chime
            .set_sound_enabled(state.preferences.sound_enabled);
        imported
    }
}
