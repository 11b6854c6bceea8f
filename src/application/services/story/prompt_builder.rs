//! Prompt building for model-backed chapter generation

use crate::application::dto::GenerationRequest;
use crate::domain::value_objects::{StatName, StatRange};

/// Build the single textual prompt sent to a language model
pub fn build_chapter_prompt(
    request: &GenerationRequest,
    want_choices: bool,
    range: StatRange,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a children's story writer creating engaging, age-appropriate stories for kids aged 6-12.\n",
    );
    prompt.push_str(&format!(
        "Create chapter {} of a {} story featuring {}, a {} with the personality: {}.\n",
        request.chapter_number,
        request.genre,
        request.character_name,
        request.character_type,
        request.personality
    ));

    if let Some(stats) = &request.current_stats {
        let described: Vec<String> = StatName::ALL
            .iter()
            .map(|stat| {
                format!(
                    "{} {}/{}",
                    stat.display_name(),
                    stats.value_or_baseline(*stat, range),
                    range.max()
                )
            })
            .collect();
        prompt.push_str(&format!("Character stats: {}.\n", described.join(", ")));
    }

    if let Some(choice) = &request.previous_choice {
        prompt.push_str(&format!("Previous choice made: {}\n", choice));
    }
    if let Some(content) = &request.previous_content {
        prompt.push_str(&format!("Previous chapter content: {}\n", content));
    }

    prompt.push_str(
        "\nKeep the language simple and positive. Each chapter should be around 150-200 words.\n",
    );

    if want_choices {
        prompt.push_str(
            "Include exactly 2 choice options for the reader to continue the story. \
             Each choice should include stat changes based on the action (+5 to +10 for positive traits). \
             Consider how each choice would affect the character's courage, kindness, wisdom, creativity, strength, and friendship.\n",
        );
    } else {
        prompt.push_str("This chapter should continue the story naturally without choices.\n");
    }

    prompt.push_str("\nFormat your response as JSON with this structure:\n");
    prompt.push_str(&response_shape(want_choices));

    prompt
}

fn response_shape(want_choices: bool) -> String {
    if !want_choices {
        return "{\n  \"content\": \"story content here\"\n}".to_string();
    }

    let option = |emphasis: StatName| {
        let changes: Vec<String> = StatName::ALL
            .iter()
            .map(|stat| {
                let amount = if *stat == emphasis { 5 } else { 0 };
                format!("        \"{}\": {}", stat.as_str(), amount)
            })
            .collect();
        format!(
            "{{\n      \"text\": \"brief choice text\",\n      \"description\": \"what happens if they choose this\",\n      \"statChanges\": {{\n{}\n      }}\n    }}",
            changes.join(",\n")
        )
    };

    format!(
        "{{\n  \"content\": \"story content here\",\n  \"choices\": {{\n    \"optionA\": {},\n    \"optionB\": {}\n  }}\n}}",
        option(StatName::Courage),
        option(StatName::Kindness)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::ChapterPayload;
    use crate::domain::value_objects::StatProfile;

    fn request() -> GenerationRequest {
        GenerationRequest::new("Pip", "hedgehog", "curious and gentle", "mystery", 3)
    }

    #[test]
    fn test_prompt_mentions_character_and_chapter() {
        let prompt = build_chapter_prompt(&request(), false, StatRange::default());

        assert!(prompt.contains("chapter 3 of a mystery story"));
        assert!(prompt.contains("Pip, a hedgehog"));
        assert!(prompt.contains("curious and gentle"));
        assert!(prompt.contains("without choices"));
        assert!(!prompt.contains("optionA"));
    }

    #[test]
    fn test_prompt_includes_context_when_present() {
        let request = request()
            .with_previous_choice("Follow the footprints")
            .with_previous_content("Pip found a map.")
            .with_stats(StatProfile::new().with_stat(StatName::Courage, 72));

        let prompt = build_chapter_prompt(&request, true, StatRange::new(0, 100));

        assert!(prompt.contains("Previous choice made: Follow the footprints"));
        assert!(prompt.contains("Previous chapter content: Pip found a map."));
        assert!(prompt.contains("Courage 72/100"));
        assert!(prompt.contains("Kindness 50/100"));
        assert!(prompt.contains("exactly 2 choice options"));
    }

    #[test]
    fn test_response_shape_is_valid_json() {
        let shape = response_shape(true);
        let payload: ChapterPayload = serde_json::from_str(&shape).unwrap();
        assert!(payload.choices.unwrap().into_choice_set().is_some());

        let plain: ChapterPayload = serde_json::from_str(&response_shape(false)).unwrap();
        assert!(plain.choices.is_none());
    }
}
