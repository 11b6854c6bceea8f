//! Best-effort structured repair of model output
//!
//! Models wrap the requested JSON in prose, code fences or nothing at all.
//! Repair is part of the generation contract:
//! - an embedded `{ content, choices? }` block is extracted and parsed
//! - otherwise the raw text becomes the chapter content
//! - if choices were wanted but none survived, the fallback pair is used
//! - if choices were not wanted, any the model produced are dropped

use tracing::debug;

use crate::application::dto::{ChapterPayload, ChapterResult};
use crate::application::ports::outbound::GenerationError;
use crate::domain::value_objects::ChoiceSet;

/// Span from the first `{` to the last `}`, if any
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&text[start..=end])
}

/// Turn raw backend text into a chapter
pub fn repair_output(raw: &str, want_choices: bool) -> Result<ChapterResult, GenerationError> {
    if let Some(block) = extract_json_block(raw) {
        match serde_json::from_str::<ChapterPayload>(block) {
            Ok(payload) if !payload.content.trim().is_empty() => {
                let choices = payload.choices.and_then(|c| c.into_choice_set());
                return conform(ChapterResult::new(payload.content.trim(), choices), want_choices);
            }
            Ok(_) => {
                return Err(GenerationError::MalformedOutput(
                    "embedded JSON has no content".to_string(),
                ))
            }
            Err(e) => debug!(error = %e, "Embedded JSON did not parse, using raw text"),
        }
    }

    conform(ChapterResult::new(raw.trim(), None), want_choices)
}

/// Enforce the chapter invariants on an already-structured result
pub fn conform(
    mut result: ChapterResult,
    want_choices: bool,
) -> Result<ChapterResult, GenerationError> {
    let trimmed = result.content.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::MalformedOutput(
            "output has no narrative content".to_string(),
        ));
    }
    if trimmed.len() != result.content.len() {
        result.content = trimmed.to_string();
    }

    match (want_choices, result.choices.is_some()) {
        (true, false) => {
            debug!("Choices required but missing, using fallback pair");
            result.choices = Some(ChoiceSet::fallback());
        }
        (false, true) => {
            debug!("Dropping choices on a chapter without a choice point");
            result.choices = None;
        }
        _ => {}
    }

    Ok(result)
}
