use serde::{Deserialize, Serialize};

use crate::techniques::Difficulty;

/// Per-user preferences kept alongside progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppPreferences {
    #[serde(default)]
    pub has_completed_onboarding: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub preferred_difficulty: Difficulty,
}

fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            sound_enabled: true,
            notifications_enabled: true,
            preferred_difficulty: Difficulty::Beginner,
        }
    }
}
