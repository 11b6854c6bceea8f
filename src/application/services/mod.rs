//! Application services - Use case implementations
//!
//! The orchestrator turns a generation request into a chapter using whichever
//! backend is available. The story session service drives a whole story on top
//! of it, resolving choices through the choice service.

pub mod chapter_orchestrator;
pub mod choice_service;
pub mod story;
pub mod story_session_service;

pub use chapter_orchestrator::{BackendStatus, ChapterOrchestrator};
pub use choice_service::{parse_branch, resolve_choice, select_branch, BranchSelection, ChoiceError};
pub use story_session_service::{
    ChoiceOutcome, NextChapter, StorySessionError, StorySessionService,
};
