//! Persistence gateway.
//!
//! Progress, timer configuration and preferences are stored as JSON values
//! under fixed keys in a key-value store. [`Database`] keeps them in SQLite,
//! [`MemoryStore`] in memory. Application settings live separately in a
//! TOML [`Config`].

mod config;
pub mod database;
mod memory;
mod preferences;

pub use config::{BellKind, Config};
pub use database::Database;
pub use memory::MemoryStore;
pub use preferences::AppPreferences;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::progress::UserProgress;
use crate::timer::TimerConfig;

pub const USER_PROGRESS_KEY: &str = "userProgress";
pub const TIMER_CONFIG_KEY: &str = "timerConfig";
pub const APP_PREFERENCES_KEY: &str = "appPreferences";

/// Returns `~/.config/nakmuay[-dev]/` based on NAKMUAY_ENV.
///
/// Set NAKMUAY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NAKMUAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nakmuay-dev")
    } else {
        base_dir.join("nakmuay")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Timer config as written to the store, stamped with when it was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTimerConfig {
    #[serde(flatten)]
    config: TimerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used: Option<DateTime<Utc>>,
}

/// Everything the user owns, as produced by [`ProgressStore::export_data`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub progress: UserProgress,
    pub timer_config: TimerConfig,
    pub preferences: AppPreferences,
    pub export_date: DateTime<Utc>,
}

/// Import accepts any subset of an export bundle.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportBundle {
    #[serde(default)]
    progress: Option<UserProgress>,
    #[serde(default)]
    timer_config: Option<TimerConfig>,
    #[serde(default)]
    preferences: Option<AppPreferences>,
}

/// Key-value persistence with typed accessors for the trainer's state.
///
/// Implementors provide the three raw `kv_*` operations; everything else is
/// derived from them.
pub trait ProgressStore: Send {
    fn kv_get(&self, key: &str) -> Result<Option<String>>;
    fn kv_set(&self, key: &str, value: &str) -> Result<()>;
    fn kv_remove(&self, key: &str) -> Result<()>;

    /// Stored progress, or a zeroed default if nothing is stored.
    fn load_progress(&self) -> Result<UserProgress> {
        match self.kv_get(USER_PROGRESS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(UserProgress::default()),
        }
    }

    /// Persist progress with the history cut to the most recent records.
    /// `total_sessions` is written unchanged.
    fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let json = serde_json::to_string(&progress.trimmed())?;
        self.kv_set(USER_PROGRESS_KEY, &json)
    }

    fn load_timer_config(&self) -> Result<TimerConfig> {
        match self.kv_get(TIMER_CONFIG_KEY)? {
            Some(json) => {
                let stored: StoredTimerConfig = serde_json::from_str(&json)?;
                Ok(stored.config)
            }
            None => Ok(TimerConfig::default()),
        }
    }

    fn save_timer_config(&self, config: &TimerConfig) -> Result<()> {
        config.validate()?;
        let stored = StoredTimerConfig {
            config: *config,
            last_used: Some(Utc::now()),
        };
        self.kv_set(TIMER_CONFIG_KEY, &serde_json::to_string(&stored)?)
    }

    fn load_preferences(&self) -> Result<AppPreferences> {
        match self.kv_get(APP_PREFERENCES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(AppPreferences::default()),
        }
    }

    fn save_preferences(&self, preferences: &AppPreferences) -> Result<()> {
        self.kv_set(APP_PREFERENCES_KEY, &serde_json::to_string(preferences)?)
    }

    fn clear_all(&self) -> Result<()> {
        for key in [USER_PROGRESS_KEY, TIMER_CONFIG_KEY, APP_PREFERENCES_KEY] {
            self.kv_remove(key)?;
        }
        Ok(())
    }

    /// Pretty-printed JSON bundle of all stored state.
    fn export_data(&self) -> Result<String> {
        let bundle = ExportBundle {
            progress: self.load_progress()?,
            timer_config: self.load_timer_config()?,
            preferences: self.load_preferences()?,
            export_date: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    /// Restore whichever sections `data` contains. The whole bundle is
    /// parsed and validated before anything is written.
    fn import_data(&self, data: &str) -> Result<()> {
        let bundle: ImportBundle = serde_json::from_str(data)?;
        if let Some(config) = &bundle.timer_config {
            config.validate()?;
        }
        if let Some(progress) = bundle.progress {
            self.save_progress(&progress)?;
        }
        if let Some(config) = bundle.timer_config {
            self.save_timer_config(&config)?;
        }
        if let Some(preferences) = bundle.preferences {
            self.save_preferences(&preferences)?;
        }
        Ok(())
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        (**self).kv_set(key, value)
    }

    fn kv_remove(&self, key: &str) -> Result<()> {
        (**self).kv_remove(key)
    }
}
