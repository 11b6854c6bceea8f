//! JSON shape exchanged with model backends
//!
//! `{ "content": "...", "choices": { "optionA": {...}, "optionB": {...} } }`
//!
//! Models are sloppy, so every field is optional on the way in and stat values
//! may arrive as integers, floats or strings like `"+5"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Branch, ChoiceSet, StatDelta};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterPayload {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoicesPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_a: Option<BranchPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_b: Option<BranchPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "statChanges", alias = "statEffects")]
    pub stat_changes: BTreeMap<String, serde_json::Value>,
}

impl BranchPayload {
    /// Convert to a domain branch; `None` when the option has no label
    pub fn into_branch(self) -> Option<Branch> {
        let label = self.text.trim();
        if label.is_empty() {
            return None;
        }
        let effects = StatDelta::from_named(
            self.stat_changes
                .iter()
                .filter_map(|(name, value)| stat_amount(value).map(|amount| (name, amount))),
        );
        Some(Branch::new(label, self.description.trim(), effects))
    }
}

impl ChoicesPayload {
    /// Both options must be present and labelled to form a choice set
    pub fn into_choice_set(self) -> Option<ChoiceSet> {
        let option_a = self.option_a?.into_branch()?;
        let option_b = self.option_b?.into_branch()?;
        Some(ChoiceSet::new(option_a, option_b))
    }
}

impl From<&Branch> for BranchPayload {
    fn from(branch: &Branch) -> Self {
        Self {
            text: branch.label.clone(),
            description: branch.description.clone(),
            stat_changes: branch
                .effects
                .iter()
                .map(|(stat, amount)| (stat.as_str().to_string(), serde_json::Value::from(amount)))
                .collect(),
        }
    }
}

impl From<&ChoiceSet> for ChoicesPayload {
    fn from(choices: &ChoiceSet) -> Self {
        Self {
            option_a: Some(choices.option_a().into()),
            option_b: Some(choices.option_b().into()),
        }
    }
}

fn stat_amount(value: &serde_json::Value) -> Option<i32> {
    let amount = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))?,
        serde_json::Value::String(s) => s.trim().trim_start_matches('+').parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(amount).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{BranchId, StatName};

    #[test]
    fn test_parses_full_payload() {
        let json = r#"{
            "content": "Luna flew over the hills.",
            "choices": {
                "optionA": {"text": "Land", "description": "Rest a while", "statChanges": {"wisdom": 5, "courage": 0}},
                "optionB": {"text": "Fly on", "description": "Keep going", "statEffects": {"courage": "+7", "luck": 3}}
            }
        }"#;

        let payload: ChapterPayload = serde_json::from_str(json).unwrap();
        let choices = payload.choices.unwrap().into_choice_set().unwrap();

        assert_eq!(choices.branch(BranchId::A).effects.get(StatName::Wisdom), 5);
        assert_eq!(choices.branch(BranchId::B).label, "Fly on");
        assert_eq!(choices.branch(BranchId::B).effects.get(StatName::Courage), 7);
        assert_eq!(choices.branch(BranchId::B).effects.iter().count(), 1);
    }

    #[test]
    fn test_missing_option_yields_no_choice_set() {
        let json = r#"{"optionA": {"text": "Only one"}}"#;
        let choices: ChoicesPayload = serde_json::from_str(json).unwrap();
        assert!(choices.into_choice_set().is_none());
    }

    #[test]
    fn test_unlabelled_option_yields_no_choice_set() {
        let json = r#"{"optionA": {"text": "Go"}, "optionB": {"text": "  ", "description": "?"}}"#;
        let choices: ChoicesPayload = serde_json::from_str(json).unwrap();
        assert!(choices.into_choice_set().is_none());
    }

    #[test]
    fn test_float_amounts_are_rounded() {
        assert_eq!(stat_amount(&serde_json::json!(4.6)), Some(5));
        assert_eq!(stat_amount(&serde_json::json!("-3")), Some(-3));
        assert_eq!(stat_amount(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_serializes_domain_choices_with_wire_names() {
        let payload = ChoicesPayload::from(&ChoiceSet::fallback());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["optionA"]["statChanges"]["courage"], 5);
        assert_eq!(json["optionB"]["text"], "Help someone in need");
    }
}
