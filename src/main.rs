//! FAIryTale Engine - demo runner
//!
//! Wires the generation backends together and plays one story from the first
//! chapter to the last against in-memory storage, always taking the first
//! branch. Each chapter is printed as JSON.

use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fairytale_engine::application::ports::outbound::StoryBackend;
use fairytale_engine::application::services::{ChapterOrchestrator, StorySessionService};
use fairytale_engine::domain::entities::{Character, Story};
use fairytale_engine::domain::services::{ChoicePolicy, ProgressionTracker};
use fairytale_engine::domain::value_objects::{BranchId, StatProfile};
use fairytale_engine::infrastructure::config::AppConfig;
use fairytale_engine::infrastructure::persistence::InMemoryStoryRepository;
use fairytale_engine::infrastructure::process_backend::ProcessStoryBackend;
use fairytale_engine::infrastructure::process_runner::TokioProcessRunner;
use fairytale_engine::infrastructure::remote_backend::RemoteStoryBackend;
use fairytale_engine::infrastructure::template_backend::TemplateBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairytale_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FAIryTale Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    let settings = config.story.clone();
    let stat_range = settings.stat_range();
    tracing::info!("Configuration loaded");
    tracing::info!(
        "  Remote service: {}",
        config.remote_url.as_deref().unwrap_or("disabled")
    );
    tracing::info!(
        "  Local runtime: {} ({}), enabled: {}",
        config.local_runtime_program,
        config.local_model,
        config.local_runtime_enabled
    );
    tracing::info!(
        "  Chapters: max {}, choices every {} below {}",
        settings.max_chapters,
        settings.choice_interval,
        settings.choice_cutoff
    );

    // Backends in priority order, template last
    let remote = RemoteStoryBackend::new(config.remote_url.as_deref(), config.remote_timeout)
        .with_api_key(config.remote_api_key.clone())
        .with_probe_timeout(config.probe_timeout);
    let process = ProcessStoryBackend::new(
        Arc::new(TokioProcessRunner::new()),
        &config.local_runtime_program,
        &config.local_model,
        config.process_timeout,
    )
    .with_enabled(config.local_runtime_enabled)
    .with_probe_timeout(config.probe_timeout)
    .with_stat_range(stat_range);
    let backends: Vec<Arc<dyn StoryBackend>> = vec![
        Arc::new(remote),
        Arc::new(process),
        Arc::new(TemplateBackend::new()),
    ];

    let orchestrator = Arc::new(ChapterOrchestrator::new(
        backends,
        ChoicePolicy::from_settings(&settings),
    ));
    for status in orchestrator.backend_status().await {
        tracing::info!(backend = %status.name, available = status.available, "Backend status");
    }

    // Demo character and story
    let storage = Arc::new(InMemoryStoryRepository::new());
    let character = Character::new("Luna", "unicorn", "brave and kind")
        .with_stats(StatProfile::baseline(stat_range));
    let story = Story::new(
        character.id,
        "Luna and the Crystal Garden",
        "fantasy",
        settings.initial_total_chapters,
    );
    storage.save_character(character.clone()).await;
    storage.save_story(story.clone()).await;

    let session = StorySessionService::new(
        storage.clone(),
        orchestrator,
        ProgressionTracker::from_settings(&settings),
        stat_range,
    );

    let mut character = character;
    loop {
        let next = session.next_chapter(story.id, None).await?;
        let chapter_number = next.chapter.chapter_number;
        let has_choices = next.chapter.has_choices();
        let completed = next.story.is_completed;

        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "backend": next.backend,
                "chapter": next.chapter,
                "story": next.story,
            }))?
        );
        storage.save_chapter(next.chapter).await;
        storage.save_story(next.story).await;

        if has_choices {
            let outcome = session
                .make_choice(story.id, chapter_number, BranchId::A)
                .await?;
            tracing::info!(
                chapter = chapter_number,
                label = outcome.chapter.selected_label().unwrap_or_default(),
                "Took first branch"
            );
            character = outcome.character.clone();
            storage.save_chapter(outcome.chapter).await;
            storage.save_character(outcome.character).await;
        }

        if completed {
            break;
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "character": character.name,
            "finalStats": character.stats,
        }))?
    );
    tracing::info!("Story complete");

    Ok(())
}
