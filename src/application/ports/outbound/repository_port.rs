//! Storage port - read access to characters, stories and chapters
//!
//! The engine only reads through this port. New and updated entities are
//! handed back to the caller, which owns persistence.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::{Chapter, Character, Story};
use crate::domain::value_objects::{CharacterId, StoryId};

#[async_trait]
pub trait StoryStoragePort: Send + Sync {
    /// Get a character by ID
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>>;

    /// Get a story by ID
    async fn get_story(&self, id: StoryId) -> Result<Option<Story>>;

    /// All chapters of a story, ordered by chapter number
    async fn get_story_chapters(&self, story_id: StoryId) -> Result<Vec<Chapter>>;
}
