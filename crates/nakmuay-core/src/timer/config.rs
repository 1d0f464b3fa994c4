use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Round timer configuration.
///
/// Immutable for the lifetime of a session; edited only between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    pub rounds: u32,
    /// Round length in seconds.
    pub round_duration: u32,
    /// Rest length in seconds. Zero is allowed.
    pub rest_duration: u32,
    pub bell_enabled: bool,
}

impl TimerConfig {
    pub const DEFAULT_ROUNDS: u32 = 3;
    pub const DEFAULT_ROUND_SECS: u32 = 180;
    pub const DEFAULT_REST_SECS: u32 = 60;

    /// Build a validated config.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when `rounds` or `round_duration` is zero.
    pub fn new(
        rounds: u32,
        round_duration: u32,
        rest_duration: u32,
        bell_enabled: bool,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            rounds,
            round_duration,
            rest_duration,
            bell_enabled,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds < 1 {
            return Err(ValidationError::invalid("rounds", "must be at least 1"));
        }
        if self.round_duration == 0 {
            return Err(ValidationError::invalid(
                "roundDuration",
                "must be greater than 0 seconds",
            ));
        }
        Ok(())
    }

    /// Length of one round plus its rest, in seconds.
    pub fn cycle_secs(&self) -> u64 {
        u64::from(self.round_duration) + u64::from(self.rest_duration)
    }

    /// Nominal length of the whole session, in seconds.
    pub fn total_secs(&self) -> u64 {
        self.cycle_secs().saturating_mul(u64::from(self.rounds))
    }

    /// Apply a partial update, keeping unspecified fields.
    pub fn merged(&self, patch: &TimerConfigPatch) -> Result<Self, ValidationError> {
        Self::new(
            patch.rounds.unwrap_or(self.rounds),
            patch.round_duration.unwrap_or(self.round_duration),
            patch.rest_duration.unwrap_or(self.rest_duration),
            patch.bell_enabled.unwrap_or(self.bell_enabled),
        )
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            rounds: Self::DEFAULT_ROUNDS,
            round_duration: Self::DEFAULT_ROUND_SECS,
            rest_duration: Self::DEFAULT_REST_SECS,
            bell_enabled: true,
        }
    }
}

/// Partial timer configuration update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bell_enabled: Option<bool>,
}
