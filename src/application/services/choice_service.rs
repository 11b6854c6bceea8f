//! Choice resolution
//!
//! Looks up the effect of a branch on a chapter and records which branch the
//! reader committed to. Applying the effect to a character is left to the
//! caller so a chapter can be revisited without replaying it.

use tracing::debug;

use crate::domain::entities::Chapter;
use crate::domain::value_objects::{BranchId, StatDelta};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("Chapter {chapter_number} has no choices")]
    NoChoicesAvailable { chapter_number: u32 },
    #[error("Invalid branch: {0}")]
    InvalidBranch(String),
}

/// Outcome of committing to a branch
#[derive(Debug, Clone)]
pub struct BranchSelection {
    /// Copy of the chapter with the selection recorded
    pub chapter: Chapter,
    /// Effect of the selected branch
    pub delta: StatDelta,
    /// False when the chapter already had a selection and this was a review
    pub first_selection: bool,
}

/// Parse a branch id as sent by clients ("A", "optionB", ...)
pub fn parse_branch(input: &str) -> Result<BranchId, ChoiceError> {
    input
        .parse()
        .map_err(|_| ChoiceError::InvalidBranch(input.to_string()))
}

/// Effect of `branch` on `chapter`
pub fn resolve_choice(chapter: &Chapter, branch: BranchId) -> Result<StatDelta, ChoiceError> {
    let choices = chapter
        .choices
        .as_ref()
        .ok_or(ChoiceError::NoChoicesAvailable {
            chapter_number: chapter.chapter_number,
        })?;
    Ok(choices.branch(branch).effects.clone())
}

/// Commit to `branch`, or review an earlier commitment.
///
/// Only the first selection on a chapter counts. On review the recorded branch
/// is kept and its effect returned, with `first_selection` false.
pub fn select_branch(chapter: &Chapter, branch: BranchId) -> Result<BranchSelection, ChoiceError> {
    if let Some(previous) = chapter.selected_branch {
        debug!(
            chapter = chapter.chapter_number,
            selected = %previous,
            requested = %branch,
            "Chapter already has a selection, reviewing"
        );
        return Ok(BranchSelection {
            chapter: chapter.clone(),
            delta: resolve_choice(chapter, previous)?,
            first_selection: false,
        });
    }

    let delta = resolve_choice(chapter, branch)?;
    let mut marked = chapter.clone();
    marked.selected_branch = Some(branch);

    Ok(BranchSelection {
        chapter: marked,
        delta,
        first_selection: true,
    })
}
