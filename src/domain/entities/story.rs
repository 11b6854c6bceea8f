//! Story entity - a single branching tale about one character

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, StoryId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub character_id: CharacterId,
    pub title: String,
    pub genre: String,
    pub current_chapter: u32,
    /// Current horizon; grows as chapters are written
    pub total_chapters: u32,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(
        character_id: CharacterId,
        title: impl Into<String>,
        genre: impl Into<String>,
        initial_total_chapters: u32,
    ) -> Self {
        Self {
            id: StoryId::new(),
            character_id,
            title: title.into(),
            genre: genre.into(),
            current_chapter: 1,
            total_chapters: initial_total_chapters,
            is_completed: false,
            created_at: Utc::now(),
        }
    }
}
