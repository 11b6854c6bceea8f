//! Character entity - the reader's hero and their evolving stats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, StatDelta, StatProfile, StatRange};

/// The hero a story is written about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Free-form archetype, e.g. "dragon" or "space explorer"
    pub character_type: String,
    /// Free-form personality description
    pub personality: String,
    pub stats: StatProfile,
    pub created_at: DateTime<Utc>,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        character_type: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            character_type: character_type.into(),
            personality: personality.into(),
            stats: StatProfile::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_stats(mut self, stats: StatProfile) -> Self {
        self.stats = stats;
        self
    }

    /// Copy of this character with `delta` applied to its stats
    pub fn with_delta_applied(&self, delta: &StatDelta, range: StatRange) -> Self {
        Self {
            stats: self.stats.apply_delta(delta, range),
            ..self.clone()
        }
    }
}
