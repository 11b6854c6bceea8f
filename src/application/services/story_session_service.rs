//! Story Session Service - play a story one chapter at a time
//!
//! Reads the current state through the storage port, asks the orchestrator for
//! the next chapter and resolves reader choices. Nothing is written back here:
//! every updated entity is returned to the caller to persist.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, instrument};

use crate::application::dto::GenerationRequest;
use crate::application::ports::outbound::StoryStoragePort;
use crate::application::services::chapter_orchestrator::ChapterOrchestrator;
use crate::application::services::choice_service::{select_branch, ChoiceError};
use crate::domain::entities::{Chapter, Character, Story};
use crate::domain::services::ProgressionTracker;
use crate::domain::value_objects::{BranchId, CharacterId, StatDelta, StatRange, StoryId};

#[derive(Debug, thiserror::Error)]
pub enum StorySessionError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error("Chapter {chapter_number} not found in story {story_id}")]
    ChapterNotFound { story_id: StoryId, chapter_number: u32 },
    #[error("Story {0} is already completed")]
    StoryCompleted(StoryId),
    #[error(transparent)]
    Choice(#[from] ChoiceError),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// A freshly generated chapter and the story advanced past it
#[derive(Debug, Clone)]
pub struct NextChapter {
    pub chapter: Chapter,
    pub story: Story,
    /// Backend that wrote the chapter
    pub backend: String,
}

/// Result of a reader picking a branch
#[derive(Debug, Clone)]
pub struct ChoiceOutcome {
    pub chapter: Chapter,
    pub character: Character,
    pub delta: StatDelta,
    /// False on review: the chapter already had a selection and stats were left alone
    pub applied: bool,
}

pub struct StorySessionService<S: StoryStoragePort> {
    storage: Arc<S>,
    orchestrator: Arc<ChapterOrchestrator>,
    tracker: ProgressionTracker,
    stat_range: StatRange,
}

impl<S: StoryStoragePort> StorySessionService<S> {
    pub fn new(
        storage: Arc<S>,
        orchestrator: Arc<ChapterOrchestrator>,
        tracker: ProgressionTracker,
        stat_range: StatRange,
    ) -> Self {
        Self {
            storage,
            orchestrator,
            tracker,
            stat_range,
        }
    }

    /// Generate the chapter after the last stored one
    #[instrument(skip(self))]
    pub async fn next_chapter(
        &self,
        story_id: StoryId,
        deadline: Option<Instant>,
    ) -> Result<NextChapter, StorySessionError> {
        let story = self.load_story(story_id).await?;
        if story.is_completed {
            return Err(StorySessionError::StoryCompleted(story_id));
        }
        let character = self.load_character(story.character_id).await?;
        let chapters = self.storage.get_story_chapters(story_id).await?;

        let chapter_number = if chapters.is_empty() {
            1
        } else {
            story.current_chapter + 1
        };

        let mut request = GenerationRequest::for_character(&character, &story.genre, chapter_number);
        // Only a choice made on the chapter just before carries forward
        if let Some(choice) = chapters.last().and_then(|c| c.selected_label()) {
            request = request.with_previous_choice(choice);
        }
        if !chapters.is_empty() {
            let previous: Vec<&str> = chapters.iter().map(|c| c.content.as_str()).collect();
            request = request.with_previous_content(previous.join("\n\n"));
        }

        let result = match deadline {
            Some(deadline) => self.orchestrator.generate_chapter_before(&request, deadline).await,
            None => self.orchestrator.generate_chapter(&request).await,
        };

        let chapter = Chapter::new(story.id, chapter_number, result.content, result.choices);
        let story = self.tracker.advance(&story, chapter_number).apply_to(&story);

        info!(
            chapter = chapter_number,
            backend = %result.backend,
            total = story.total_chapters,
            completed = story.is_completed,
            "Chapter ready"
        );

        Ok(NextChapter {
            chapter,
            story,
            backend: result.backend,
        })
    }

    /// Commit the reader to `branch` on a stored chapter
    #[instrument(skip(self))]
    pub async fn make_choice(
        &self,
        story_id: StoryId,
        chapter_number: u32,
        branch: BranchId,
    ) -> Result<ChoiceOutcome, StorySessionError> {
        let story = self.load_story(story_id).await?;
        let chapter = self
            .storage
            .get_story_chapters(story_id)
            .await?
            .into_iter()
            .find(|c| c.chapter_number == chapter_number)
            .ok_or(StorySessionError::ChapterNotFound {
                story_id,
                chapter_number,
            })?;
        let character = self.load_character(story.character_id).await?;

        let selection = select_branch(&chapter, branch)?;
        let character = if selection.first_selection {
            character.with_delta_applied(&selection.delta, self.stat_range)
        } else {
            character
        };

        info!(
            chapter = chapter_number,
            branch = %branch,
            applied = selection.first_selection,
            "Choice resolved"
        );

        Ok(ChoiceOutcome {
            chapter: selection.chapter,
            character,
            delta: selection.delta,
            applied: selection.first_selection,
        })
    }

    async fn load_story(&self, id: StoryId) -> Result<Story, StorySessionError> {
        self.storage
            .get_story(id)
            .await?
            .ok_or(StorySessionError::StoryNotFound(id))
    }

    async fn load_character(&self, id: CharacterId) -> Result<Character, StorySessionError> {
        self.storage
            .get_character(id)
            .await?
            .ok_or(StorySessionError::CharacterNotFound(id))
    }
}
