//! Data Transfer Objects - For backend and API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP, subprocess) can
//! serialize/deserialize without pulling wire formats into the domain model.

mod chapter_payload;
mod generation;

pub use chapter_payload::{BranchPayload, ChapterPayload, ChoicesPayload};
pub use generation::{ChapterResult, GenerationRequest};
