//! Helpers shared by model-backed generation: prompts in, repaired chapters out

pub mod output_parser;
pub mod prompt_builder;

pub use output_parser::{conform, extract_json_block, repair_output};
pub use prompt_builder::build_chapter_prompt;
