//! Progression tracker - current/total chapter bookkeeping and completion

use serde::{Deserialize, Serialize};

use crate::domain::entities::Story;
use crate::domain::value_objects::StorySettings;

/// Chapter counters after a chapter has been produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub current_chapter: u32,
    pub total_chapters: u32,
    pub is_completed: bool,
}

impl Progression {
    /// Copy of `story` carrying these counters
    pub fn apply_to(&self, story: &Story) -> Story {
        Story {
            current_chapter: self.current_chapter,
            total_chapters: self.total_chapters,
            is_completed: self.is_completed,
            ..story.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionTracker {
    max_chapters: u32,
}

impl ProgressionTracker {
    /// Chapters written beyond the current one when extending the horizon
    const LOOKAHEAD: u32 = 2;

    pub fn new(max_chapters: u32) -> Self {
        Self {
            max_chapters: max_chapters.max(1),
        }
    }

    pub fn from_settings(settings: &StorySettings) -> Self {
        Self::new(settings.max_chapters)
    }

    pub fn advance(&self, story: &Story, chapter_number: u32) -> Progression {
        Progression {
            current_chapter: chapter_number,
            total_chapters: story
                .total_chapters
                .max(chapter_number.saturating_add(Self::LOOKAHEAD)),
            is_completed: chapter_number >= self.max_chapters,
        }
    }
}

impl Default for ProgressionTracker {
    fn default() -> Self {
        Self::from_settings(&StorySettings::default())
    }
}
