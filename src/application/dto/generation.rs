//! Chapter generation request and result

use serde::{Deserialize, Serialize};

use crate::domain::entities::Character;
use crate::domain::value_objects::{ChoiceSet, StatProfile};

/// Everything a backend needs to write one chapter.
///
/// Serialized in camelCase because this is also the body posted to the remote
/// story service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub character_name: String,
    pub character_type: String,
    pub personality: String,
    pub genre: String,
    pub chapter_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_content: Option<String>,
    #[serde(
        default,
        rename = "characterStats",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_stats: Option<StatProfile>,
}

impl GenerationRequest {
    pub fn new(
        character_name: impl Into<String>,
        character_type: impl Into<String>,
        personality: impl Into<String>,
        genre: impl Into<String>,
        chapter_number: u32,
    ) -> Self {
        Self {
            character_name: character_name.into(),
            character_type: character_type.into(),
            personality: personality.into(),
            genre: genre.into(),
            chapter_number,
            previous_choice: None,
            previous_content: None,
            current_stats: None,
        }
    }

    /// Request for `character` with their current stats attached
    pub fn for_character(character: &Character, genre: impl Into<String>, chapter_number: u32) -> Self {
        Self::new(
            character.name.clone(),
            character.character_type.clone(),
            character.personality.clone(),
            genre,
            chapter_number,
        )
        .with_stats(character.stats.clone())
    }

    pub fn with_previous_choice(mut self, choice: impl Into<String>) -> Self {
        self.previous_choice = Some(choice.into());
        self
    }

    pub fn with_previous_content(mut self, content: impl Into<String>) -> Self {
        self.previous_content = Some(content.into());
        self
    }

    pub fn with_stats(mut self, stats: StatProfile) -> Self {
        self.current_stats = Some(stats);
        self
    }
}

/// A generated chapter. Never mutated after the orchestrator returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterResult {
    /// Narrative text, never empty
    pub content: String,
    pub choices: Option<ChoiceSet>,
    /// Name of the backend that produced the chapter
    pub backend: String,
}

impl ChapterResult {
    pub fn new(content: impl Into<String>, choices: Option<ChoiceSet>) -> Self {
        Self {
            content: content.into(),
            choices,
            backend: String::new(),
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }
}
