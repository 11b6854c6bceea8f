//! Story rule settings
//!
//! Stat bounds, story length and choice cadence are deployment choices, not
//! constants baked into the rules. They are read from the environment with
//! defaults for anything missing or unparseable.

use serde::{Deserialize, Serialize};

use super::stats::StatRange;

/// All configurable story rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorySettings {
    // Stats
    pub stat_min: i32,
    pub stat_max: i32,

    // Progression
    pub max_chapters: u32,
    pub initial_total_chapters: u32,

    // Choices
    pub choice_interval: u32,
    /// Choices are only offered on chapters strictly below this number
    pub choice_cutoff: u32,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            stat_min: 0,
            stat_max: 100,
            max_chapters: 8,
            initial_total_chapters: 5,
            choice_interval: 3,
            choice_cutoff: 8,
        }
    }
}

impl StorySettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            stat_min: env_or("STORY_STAT_MIN", defaults.stat_min),
            stat_max: env_or("STORY_STAT_MAX", defaults.stat_max),
            max_chapters: env_or("STORY_MAX_CHAPTERS", defaults.max_chapters),
            initial_total_chapters: env_or(
                "STORY_INITIAL_TOTAL_CHAPTERS",
                defaults.initial_total_chapters,
            ),
            choice_interval: env_or("STORY_CHOICE_INTERVAL", defaults.choice_interval),
            choice_cutoff: env_or("STORY_CHOICE_CUTOFF", defaults.choice_cutoff),
        }
        .normalized()
    }

    /// Repair nonsensical combinations instead of rejecting them
    pub fn normalized(mut self) -> Self {
        if self.stat_min > self.stat_max {
            std::mem::swap(&mut self.stat_min, &mut self.stat_max);
        }
        self.max_chapters = self.max_chapters.max(1);
        self.choice_interval = self.choice_interval.max(1);
        self
    }

    pub fn stat_range(&self) -> StatRange {
        StatRange::new(self.stat_min, self.stat_max)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
