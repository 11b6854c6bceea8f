//! Deterministic template backend
//!
//! Offline chapter writer. Picks a genre narrative, fills its slots from fixed
//! pools and, at choice points, attaches a genre choice pair. Every pick is a
//! function of the chapter number so the same request always yields the same
//! chapter.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::dto::{ChapterResult, GenerationRequest};
use crate::application::ports::outbound::{BackendOutput, GenerationError, StoryBackend};
use crate::domain::value_objects::{Branch, ChoiceSet, StatDelta, StatName};

struct BranchTemplate {
    label: &'static str,
    description: &'static str,
    effects: &'static [(StatName, i32)],
}

impl BranchTemplate {
    fn to_branch(&self) -> Branch {
        let effects = self
            .effects
            .iter()
            .fold(StatDelta::new(), |delta, (stat, amount)| delta.with(*stat, *amount));
        Branch::new(self.label, self.description, effects)
    }
}

struct GenrePool {
    narratives: [&'static str; 3],
    choices: [(BranchTemplate, BranchTemplate); 2],
}

static ADVENTURE: GenrePool = GenrePool {
    narratives: [
        "{name} ventures deeper into the mysterious {location}. The air {atmosphere}, and every shadow seems to hold a secret waiting to be discovered. With {personality} determination, our {type} hero notices {discovery} that sparks their curiosity.",
        "The path ahead splits into {branches}. {name} pauses, remembering the lessons learned from {past_experience}. The {type}'s {personality} nature guides them as they consider which way will lead to the greatest adventure.",
        "Suddenly, {name} encounters {character_encounter}. The {type}'s eyes light up with {emotion} as they realize this meeting could change everything. Their {personality} personality shines through as they decide how to approach this new situation.",
    ],
    choices: [
        (
            BranchTemplate {
                label: "Take the brave path",
                description: "Face the challenge head-on with courage",
                effects: &[(StatName::Courage, 8), (StatName::Strength, 3)],
            },
            BranchTemplate {
                label: "Help others first",
                description: "Look for ways to assist those in need",
                effects: &[(StatName::Kindness, 8), (StatName::Friendship, 3)],
            },
        ),
        (
            BranchTemplate {
                label: "Explore the unknown",
                description: "Venture into mysterious new territory",
                effects: &[(StatName::Courage, 6), (StatName::Creativity, 5)],
            },
            BranchTemplate {
                label: "Study the situation",
                description: "Take time to understand before acting",
                effects: &[(StatName::Wisdom, 8), (StatName::Creativity, 2)],
            },
        ),
    ],
};

static FANTASY: GenrePool = GenrePool {
    narratives: [
        "Magic crackles in the air around {name} as they discover {magical_element}. The {type}'s {personality} spirit allows them to sense the ancient power that flows through this enchanted realm.",
        "{name} meets {fantasy_creature} who shares {wisdom_or_challenge}. With their {personality} heart, the {type} listens carefully, understanding that this encounter will shape their magical journey.",
        "The mystical {magical_location} reveals its secrets to {name}. As a {personality} {type}, they approach the magical mysteries with both wonder and respect.",
    ],
    choices: [
        (
            BranchTemplate {
                label: "Use magic wisely",
                description: "Apply magical knowledge with careful thought",
                effects: &[(StatName::Wisdom, 8), (StatName::Creativity, 3)],
            },
            BranchTemplate {
                label: "Trust your heart",
                description: "Let intuition and kindness guide the way",
                effects: &[(StatName::Kindness, 8), (StatName::Friendship, 3)],
            },
        ),
        (
            BranchTemplate {
                label: "Seek ancient wisdom",
                description: "Learn from the magical world's secrets",
                effects: &[(StatName::Wisdom, 7), (StatName::Creativity, 4)],
            },
            BranchTemplate {
                label: "Make new allies",
                description: "Build friendships with magical creatures",
                effects: &[(StatName::Friendship, 8), (StatName::Kindness, 3)],
            },
        ),
    ],
};

static MYSTERY: GenrePool = GenrePool {
    narratives: [
        "{name} discovers {clue} that doesn't quite fit with everything they've learned so far. The {type}'s {personality} nature drives them to look closer and ask the right questions.",
        "A puzzling {mystery_element} appears before {name}. Using their {personality} approach, the clever {type} begins to piece together the clues they've gathered.",
        "{name} realizes that {revelation} changes everything they thought they knew. The {type}'s {personality} wisdom helps them see connections others might miss.",
    ],
    choices: [
        (
            BranchTemplate {
                label: "Investigate carefully",
                description: "Look for clues with patience and skill",
                effects: &[(StatName::Wisdom, 8), (StatName::Creativity, 3)],
            },
            BranchTemplate {
                label: "Ask for help",
                description: "Work with others to solve the puzzle",
                effects: &[(StatName::Friendship, 8), (StatName::Kindness, 3)],
            },
        ),
        (
            BranchTemplate {
                label: "Think creatively",
                description: "Approach the mystery from a new angle",
                effects: &[(StatName::Creativity, 8), (StatName::Wisdom, 3)],
            },
            BranchTemplate {
                label: "Stay determined",
                description: "Keep pushing forward despite obstacles",
                effects: &[(StatName::Courage, 7), (StatName::Strength, 4)],
            },
        ),
    ],
};

/// Slot name and the values it can take
const SLOTS: &[(&str, &[&str])] = &[
    (
        "location",
        &[
            "ancient temple",
            "hidden valley",
            "crystal cavern",
            "floating island",
            "secret garden",
            "abandoned castle",
            "mystical forest",
            "underground city",
        ],
    ),
    (
        "atmosphere",
        &[
            "shimmers with golden light",
            "hums with mysterious energy",
            "feels charged with magic",
            "whispers with ancient voices",
            "glows with soft moonbeams",
        ],
    ),
    (
        "discovery",
        &[
            "a glowing crystal half-buried in the ground",
            "strange symbols carved into the stone",
            "a melody carried on the wind",
            "footprints leading deeper into the unknown",
            "a locked door with no visible key",
        ],
    ),
    (
        "branches",
        &[
            "two winding paths",
            "three tunnels carved into the rock",
            "multiple bridges spanning a misty gorge",
            "several doors of different colors",
        ],
    ),
    (
        "past_experience",
        &[
            "their training",
            "wise words from a friend",
            "a lesson from their adventures",
            "their inner strength",
        ],
    ),
    (
        "character_encounter",
        &[
            "a friendly guardian spirit",
            "a lost traveler seeking help",
            "a wise elder with twinkling eyes",
            "a young creature in need of assistance",
        ],
    ),
    (
        "emotion",
        &["excitement", "wonder", "determination", "compassion", "curiosity"],
    ),
    (
        "magical_element",
        &[
            "a singing fountain",
            "trees that glow with inner light",
            "floating stones that form stepping stones",
            "flowers that change color with emotions",
        ],
    ),
    (
        "fantasy_creature",
        &[
            "a talking fox with silver fur",
            "a gentle giant made of living stone",
            "a wise dragon no bigger than a cat",
            "a fairy with rainbow wings",
        ],
    ),
    (
        "wisdom_or_challenge",
        &[
            "ancient riddles that hold great wisdom",
            "a quest that could help many others",
            "songs that reveal hidden truths",
            "a challenge that will test their courage",
        ],
    ),
    (
        "magical_location",
        &[
            "Whispering Library",
            "Crystal Garden",
            "Starlight Observatory",
            "Harmony Grove",
            "Rainbow Falls",
        ],
    ),
    (
        "clue",
        &[
            "a mysterious map fragment",
            "a journal entry in an unknown language",
            "a peculiar key with no lock in sight",
            "a painting that seems to move when not watched directly",
        ],
    ),
    (
        "mystery_element",
        &[
            "coded message",
            "hidden passage",
            "secret compartment",
            "missing piece of a larger puzzle",
        ],
    ),
    (
        "revelation",
        &[
            "the friendly helper has been the one they've been seeking all along",
            "the mysterious events are all connected",
            "there's a hidden pattern to everything that's happened",
        ],
    ),
];

const CONTINUATIONS: [&str; 4] = [
    "This new development builds on everything they've learned so far.",
    "Each step of their journey has prepared them for this moment.",
    "The adventure grows more exciting with every discovery.",
    "Their growing experience helps them navigate these new challenges.",
];

fn pool_for(genre: &str) -> &'static GenrePool {
    match genre.trim().to_ascii_lowercase().as_str() {
        "fantasy" => &FANTASY,
        "mystery" => &MYSTERY,
        _ => &ADVENTURE,
    }
}

/// Deterministic pick; `salt` keeps different slots from moving in lockstep
fn pick<T>(items: &[T], chapter: u32, salt: usize) -> &T {
    &items[(chapter as usize + salt) % items.len()]
}

/// Offline backend of last resort. Never fails and never suspends.
#[derive(Debug, Clone, Default)]
pub struct TemplateBackend;

impl TemplateBackend {
    pub fn new() -> Self {
        Self
    }

    /// Write a chapter without touching any external system
    pub fn write_chapter(&self, request: &GenerationRequest, want_choices: bool) -> ChapterResult {
        let chapter = request.chapter_number;
        let pool = pool_for(&request.genre);

        let narrative = pick(&pool.narratives, chapter.saturating_sub(1), 0);
        let mut content = narrative
            .replace("{name}", &request.character_name)
            .replace("{type}", &request.character_type)
            .replace("{personality}", &request.personality);
        for (salt, (slot, values)) in SLOTS.iter().enumerate() {
            let placeholder = format!("{{{}}}", slot);
            if content.contains(&placeholder) {
                content = content.replace(&placeholder, *pick(*values, chapter, salt));
            }
        }

        if let Some(choice) = &request.previous_choice {
            content.push_str(&format!(
                " Following their choice to {}, {} feels more confident in their abilities.",
                choice.to_lowercase(),
                request.character_name
            ));
        }
        if chapter > 1 {
            content.push(' ');
            content.push_str(*pick(&CONTINUATIONS, chapter, 0));
        }

        let choices = want_choices.then(|| {
            let (a, b) = pick(&pool.choices, chapter, 0);
            ChoiceSet::new(a.to_branch(), b.to_branch())
        });

        ChapterResult::new(format!("Chapter {}: {}", chapter, content), choices)
    }
}

#[async_trait]
impl StoryBackend for TemplateBackend {
    fn name(&self) -> &str {
        "template"
    }

    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn probe(&self) -> bool {
        true
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        want_choices: bool,
    ) -> Result<BackendOutput, GenerationError> {
        Ok(BackendOutput::Structured(self.write_chapter(request, want_choices)))
    }
}
