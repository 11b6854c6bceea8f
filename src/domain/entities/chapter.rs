//! Chapter entity - one generated unit of a story

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BranchId, ChapterId, ChoiceSet, StoryId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub story_id: StoryId,
    pub chapter_number: u32,
    pub content: String,
    pub choices: Option<ChoiceSet>,
    /// Set once the reader commits to a branch; later visits are review-only
    pub selected_branch: Option<BranchId>,
    pub created_at: DateTime<Utc>,
}

impl Chapter {
    pub fn new(
        story_id: StoryId,
        chapter_number: u32,
        content: impl Into<String>,
        choices: Option<ChoiceSet>,
    ) -> Self {
        Self {
            id: ChapterId::new(),
            story_id,
            chapter_number,
            content: content.into(),
            choices,
            selected_branch: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_choices(&self) -> bool {
        self.choices.is_some()
    }

    /// Label of the selected branch, if a selection was made
    pub fn selected_label(&self) -> Option<&str> {
        let choices = self.choices.as_ref()?;
        let branch = self.selected_branch?;
        Some(choices.branch(branch).label.as_str())
    }
}
