//! Binary choices offered at the end of a chapter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stats::{StatDelta, StatName};

/// Which of the two branches a reader picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchId {
    A,
    B,
}

impl BranchId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid branch id: {0}")]
pub struct InvalidBranchId(pub String);

impl FromStr for BranchId {
    type Err = InvalidBranchId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "optiona" | "option_a" => Ok(Self::A),
            "b" | "optionb" | "option_b" => Ok(Self::B),
            _ => Err(InvalidBranchId(s.to_string())),
        }
    }
}

/// One option in a choice set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Short button text
    pub label: String,
    /// What happens if the reader picks this option
    pub description: String,
    /// Stat adjustment applied when the branch is chosen
    pub effects: StatDelta,
}

impl Branch {
    pub fn new(label: impl Into<String>, description: impl Into<String>, effects: StatDelta) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            effects,
        }
    }
}

/// Exactly two branches. The type has no way to hold any other number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    option_a: Branch,
    option_b: Branch,
}

impl ChoiceSet {
    pub fn new(option_a: Branch, option_b: Branch) -> Self {
        Self { option_a, option_b }
    }

    /// Pair used when a generator was asked for choices but produced none
    pub fn fallback() -> Self {
        Self::new(
            Branch::new(
                "Continue the adventure",
                "Keep exploring with courage",
                StatDelta::new().with(StatName::Courage, 5),
            ),
            Branch::new(
                "Help someone in need",
                "Show kindness to others",
                StatDelta::new().with(StatName::Kindness, 5),
            ),
        )
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        match id {
            BranchId::A => &self.option_a,
            BranchId::B => &self.option_b,
        }
    }

    pub fn option_a(&self) -> &Branch {
        &self.option_a
    }

    pub fn option_b(&self) -> &Branch {
        &self.option_b
    }

    pub fn iter(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        [(BranchId::A, &self.option_a), (BranchId::B, &self.option_b)].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_id_parsing() {
        assert_eq!("a".parse::<BranchId>(), Ok(BranchId::A));
        assert_eq!("optionB".parse::<BranchId>(), Ok(BranchId::B));
        assert!("C".parse::<BranchId>().is_err());
    }

    #[test]
    fn test_fallback_has_two_nonzero_branches() {
        let choices = ChoiceSet::fallback();
        assert_eq!(choices.iter().count(), 2);
        assert!(choices.iter().all(|(_, branch)| !branch.effects.is_zero()));
        assert_eq!(choices.branch(BranchId::B).effects.get(StatName::Kindness), 5);
    }
}
