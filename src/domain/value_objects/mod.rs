//! Value objects - Immutable objects defined by their attributes

mod choices;
mod ids;
mod settings;
mod stats;

pub use choices::{Branch, BranchId, ChoiceSet, InvalidBranchId};
pub use ids::*;
pub use settings::StorySettings;
pub use stats::{StatDelta, StatName, StatProfile, StatRange, UnknownStat};
