//! Character stat model
//!
//! A character carries a fixed set of named attributes. Every stored value stays
//! inside a configured [`StatRange`]; writes outside the range are clamped, never
//! rejected. Choices carry a [`StatDelta`] that is applied once when the reader
//! commits to a branch.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The named attributes tracked for every character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Courage,
    Kindness,
    Wisdom,
    Creativity,
    Strength,
    Friendship,
}

impl StatName {
    pub const ALL: [StatName; 6] = [
        StatName::Courage,
        StatName::Kindness,
        StatName::Wisdom,
        StatName::Creativity,
        StatName::Strength,
        StatName::Friendship,
    ];

    /// Wire name used in JSON payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Courage => "courage",
            Self::Kindness => "kindness",
            Self::Wisdom => "wisdom",
            Self::Creativity => "creativity",
            Self::Strength => "strength",
            Self::Friendship => "friendship",
        }
    }

    /// Capitalized name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Courage => "Courage",
            Self::Kindness => "Kindness",
            Self::Wisdom => "Wisdom",
            Self::Creativity => "Creativity",
            Self::Strength => "Strength",
            Self::Friendship => "Friendship",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stat name outside the fixed set. Non-fatal: deltas simply skip it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown stat: {0}")]
pub struct UnknownStat(pub String);

impl FromStr for StatName {
    type Err = UnknownStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "courage" => Ok(Self::Courage),
            "kindness" => Ok(Self::Kindness),
            // Older character records call this stat intelligence
            "wisdom" | "intelligence" => Ok(Self::Wisdom),
            "creativity" => Ok(Self::Creativity),
            "strength" => Ok(Self::Strength),
            "friendship" => Ok(Self::Friendship),
            _ => Err(UnknownStat(s.to_string())),
        }
    }
}

/// Closed range `[min, max]` every stat value must stay within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    min: i32,
    max: i32,
}

impl StatRange {
    /// Build a range; swapped bounds are reordered.
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Value assumed for a stat the profile has never recorded
    pub fn baseline(&self) -> i32 {
        self.min + (self.max - self.min) / 2
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for StatRange {
    fn default() -> Self {
        Self::new(0, 100)
    }
}

/// A character's current stat values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatProfile(BTreeMap<StatName, i32>);

impl StatProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stat set to the range baseline
    pub fn baseline(range: StatRange) -> Self {
        Self(
            StatName::ALL
                .iter()
                .map(|stat| (*stat, range.baseline()))
                .collect(),
        )
    }

    pub fn with_stat(mut self, stat: StatName, value: i32) -> Self {
        self.0.insert(stat, value);
        self
    }

    pub fn get(&self, stat: StatName) -> Option<i32> {
        self.0.get(&stat).copied()
    }

    /// Recorded value, or the range baseline when the stat was never set
    pub fn value_or_baseline(&self, stat: StatName, range: StatRange) -> i32 {
        self.get(stat).unwrap_or_else(|| range.baseline())
    }

    /// Store a value, clamped into `range`
    pub fn set(&mut self, stat: StatName, value: i32, range: StatRange) {
        self.0.insert(stat, range.clamp(value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        self.0.iter().map(|(stat, value)| (*stat, *value))
    }

    /// Copy of this profile with every recorded value clamped into `range`
    pub fn clamped(&self, range: StatRange) -> Self {
        Self(
            self.0
                .iter()
                .map(|(stat, value)| (*stat, range.clamp(*value)))
                .collect(),
        )
    }

    /// Apply a delta and return the new profile.
    ///
    /// Each adjusted stat starts from its recorded value (or the baseline when
    /// missing) and the sum is clamped per key. Zero adjustments leave the
    /// profile untouched.
    ///
    /// A missing stat that receives a non-zero adjustment becomes recorded and
    /// stays recorded, so undoing a delta restores values but not absent keys.
    /// Compare sparse profiles with `value_or_baseline`.
    pub fn apply_delta(&self, delta: &StatDelta, range: StatRange) -> Self {
        let mut next = self.clamped(range);
        for (stat, amount) in delta.iter() {
            if amount == 0 {
                continue;
            }
            let current = next.value_or_baseline(stat, range);
            next.set(stat, current.saturating_add(amount), range);
        }
        next
    }
}

impl FromIterator<(StatName, i32)> for StatProfile {
    fn from_iter<T: IntoIterator<Item = (StatName, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Signed per-stat adjustment carried by a choice branch.
///
/// Absent stats mean zero effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatDelta(BTreeMap<StatName, i32>);

impl StatDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stat: StatName, amount: i32) -> Self {
        self.0.insert(stat, amount);
        self
    }

    /// Build a delta from loosely-typed key/value pairs, skipping unknown stat names.
    pub fn from_named<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, i32)>,
        K: AsRef<str>,
    {
        let mut delta = Self::new();
        for (name, amount) in entries {
            match name.as_ref().parse::<StatName>() {
                Ok(stat) => {
                    let entry = delta.0.entry(stat).or_insert(0);
                    *entry = entry.saturating_add(amount);
                }
                Err(e) => tracing::debug!(error = %e, "Ignoring stat delta entry"),
            }
        }
        delta
    }

    pub fn get(&self, stat: StatName) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        self.0.iter().map(|(stat, amount)| (*stat, *amount))
    }

    pub fn is_zero(&self) -> bool {
        self.0.values().all(|amount| *amount == 0)
    }

    /// The opposite adjustment
    pub fn negated(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(stat, amount)| (*stat, amount.saturating_neg()))
                .collect(),
        )
    }
}
