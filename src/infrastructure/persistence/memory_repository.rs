//! In-memory storage for characters, stories and chapters

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::StoryStoragePort;
use crate::domain::entities::{Chapter, Character, Story};
use crate::domain::value_objects::{CharacterId, StoryId};

/// Process-local store. Saving an entity with an existing ID replaces it.
#[derive(Default)]
pub struct InMemoryStoryRepository {
    characters: RwLock<HashMap<CharacterId, Character>>,
    stories: RwLock<HashMap<StoryId, Story>>,
    chapters: RwLock<HashMap<StoryId, Vec<Chapter>>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save_character(&self, character: Character) {
        self.characters.write().await.insert(character.id, character);
    }

    pub async fn save_story(&self, story: Story) {
        self.stories.write().await.insert(story.id, story);
    }

    /// Insert or replace by chapter number, keeping the list ordered
    pub async fn save_chapter(&self, chapter: Chapter) {
        let mut chapters = self.chapters.write().await;
        let list = chapters.entry(chapter.story_id).or_default();
        match list.binary_search_by_key(&chapter.chapter_number, |c| c.chapter_number) {
            Ok(index) => list[index] = chapter,
            Err(index) => list.insert(index, chapter),
        }
    }
}

#[async_trait]
impl StoryStoragePort for InMemoryStoryRepository {
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>> {
        Ok(self.characters.read().await.get(&id).cloned())
    }

    async fn get_story(&self, id: StoryId) -> Result<Option<Story>> {
        Ok(self.stories.read().await.get(&id).cloned())
    }

    async fn get_story_chapters(&self, story_id: StoryId) -> Result<Vec<Chapter>> {
        Ok(self
            .chapters
            .read()
            .await
            .get(&story_id)
            .cloned()
            .unwrap_or_default())
    }
}
