//! Technique library.
//!
//! A read-only catalog of strikes and combinations, loaded once from JSON
//! and owned by whoever builds it (normally the [`crate::Trainer`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{CoreError, Result};
use crate::progress::{SessionRecord, SessionType, UserProgress};
use crate::storage::AppPreferences;

/// Catalog bundled with the crate.
const BUNDLED_CATALOG: &str = include_str!("../../assets/combos.json");

/// Minutes credited for practising one technique.
pub const TECHNIQUE_PRACTICE_MINUTES: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Punches,
    Kicks,
    Elbows,
    Knees,
    Combos,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Punches => "Punches",
            Category::Kicks => "Kicks",
            Category::Elbows => "Elbows",
            Category::Knees => "Knees",
            Category::Combos => "Combos",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "punches" => Ok(Category::Punches),
            "kicks" => Ok(Category::Kicks),
            "elbows" => Ok(Category::Elbows),
            "knees" => Ok(Category::Knees),
            "combos" => Ok(Category::Combos),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub gif_file_name: String,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub next_combos: Vec<String>,
}

impl Technique {
    fn matches(&self, needle: &str, include_tips: bool) -> bool {
        let contains = |s: &str| s.to_lowercase().contains(needle);
        contains(&self.name)
            || contains(&self.instructions.join(" "))
            || contains(self.category.as_str())
            || (include_tips && contains(&self.tips.join(" ")))
    }
}

/// Criteria for [`Catalog::filter`]; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TechniqueFilter {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    techniques: Vec<Technique>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let techniques: Vec<Technique> = serde_json::from_str(json)?;
        tracing::debug!(count = techniques.len(), "technique catalog loaded");
        Ok(Self { techniques })
    }

    pub fn all(&self) -> &[Technique] {
        &self.techniques
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Technique> {
        self.techniques
            .iter()
            .filter(|t| t.difficulty == difficulty)
            .collect()
    }

    /// Case-insensitive match on name, instructions, category and tips.
    /// A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Technique> {
        let needle = query.trim().to_lowercase();
        self.techniques
            .iter()
            .filter(|t| needle.is_empty() || t.matches(&needle, true))
            .collect()
    }

    /// Combine category, difficulty and text criteria. Text matching here
    /// does not look at tips.
    pub fn filter(&self, criteria: &TechniqueFilter) -> Vec<&Technique> {
        let needle = criteria
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        self.techniques
            .iter()
            .filter(|t| criteria.category.map_or(true, |c| t.category == c))
            .filter(|t| criteria.difficulty.map_or(true, |d| t.difficulty == d))
            .filter(|t| needle.as_deref().map_or(true, |n| t.matches(n, false)))
            .collect()
    }

    /// Categories present, in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for t in &self.techniques {
            if !seen.contains(&t.category) {
                seen.push(t.category);
            }
        }
        seen
    }

    /// Difficulty levels present, in first-seen order.
    pub fn difficulty_levels(&self) -> Vec<Difficulty> {
        let mut seen = Vec::new();
        for t in &self.techniques {
            if !seen.contains(&t.difficulty) {
                seen.push(t.difficulty);
            }
        }
        seen
    }

    /// Suggested follow-ups for `id`. Unknown ids and dangling links are skipped.
    pub fn next_combos(&self, id: &str) -> Vec<&Technique> {
        self.get(id)
            .map(|t| t.next_combos.iter().filter_map(|n| self.get(n)).collect())
            .unwrap_or_default()
    }

    /// Starter picks based on experience and preferred difficulty.
    pub fn recommended(
        &self,
        preferences: &AppPreferences,
        progress: &UserProgress,
    ) -> Vec<&Technique> {
        let take = |d: Difficulty, n: usize| self.by_difficulty(d).into_iter().take(n);
        match progress.total_sessions {
            0 => take(Difficulty::Beginner, 3).collect(),
            n if n >= 10 => take(Difficulty::Beginner, 1)
                .chain(take(Difficulty::Intermediate, 2))
                .chain(take(Difficulty::Advanced, 1))
                .collect(),
            _ => take(preferences.preferred_difficulty, 4).collect(),
        }
    }

    /// Log entry for practising technique `id` at `at`.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] for an unknown id.
    pub fn completion_record(&self, id: &str, at: DateTime<Utc>) -> Result<SessionRecord> {
        let technique = self
            .get(id)
            .ok_or_else(|| CoreError::not_found("technique", id))?;
        Ok(SessionRecord::new(
            at.timestamp_millis().to_string(),
            at,
            SessionType::Combo,
            TECHNIQUE_PRACTICE_MINUTES,
            json!({
                "comboId": technique.id,
                "comboName": technique.name,
                "category": technique.category,
                "difficulty": technique.difficulty,
            }),
        ))
    }
}
