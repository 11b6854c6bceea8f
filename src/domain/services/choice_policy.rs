//! Choice policy - which chapters end in a branching choice

use crate::domain::value_objects::StorySettings;

/// Decides from the chapter number alone whether a chapter offers two choices.
///
/// Chapter 1 always does; after that every `interval`-th chapter does, until
/// the story reaches `cutoff` and starts converging on its ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoicePolicy {
    interval: u32,
    cutoff: u32,
}

impl ChoicePolicy {
    pub fn new(interval: u32, cutoff: u32) -> Self {
        Self {
            interval: interval.max(1),
            cutoff,
        }
    }

    pub fn from_settings(settings: &StorySettings) -> Self {
        Self::new(settings.choice_interval, settings.choice_cutoff)
    }

    pub fn should_include_choices(&self, chapter_number: u32) -> bool {
        if chapter_number == 0 || chapter_number >= self.cutoff {
            return false;
        }
        chapter_number == 1 || chapter_number % self.interval == 0
    }
}

impl Default for ChoicePolicy {
    fn default() -> Self {
        Self::from_settings(&StorySettings::default())
    }
}
