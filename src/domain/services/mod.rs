//! Domain services - Pure story rules with no I/O

mod choice_policy;
mod progression;

pub use choice_policy::ChoicePolicy;
pub use progression::{Progression, ProgressionTracker};
