//! FitTrack Session Engine demo driver
//!
//! Runs a scripted workout session against the in-memory backing store:
//! open a fresh session, build a couple of sets, let the rest countdown
//! expire, minimize to the floating bar, then finish with a template copy.

use anyhow::Result;
use fittrack_engine::clock::SystemClock;
use fittrack_engine::config::EngineConfig;
use fittrack_engine::cues::RecordingCuePlayer;
use fittrack_engine::navigation::RecordingNavigator;
use fittrack_engine::repositories::{InMemorySettingsRepository, InMemoryWorkoutRepository};
use fittrack_engine::services::{
    FloatingBar, Overlay, RestTimer, Screen, SetInput, WorkoutSession, WorkoutTimer,
};
use fittrack_engine::state::EngineState;
use fittrack_shared::{EditSessionId, Exercise};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = EngineConfig::load()?;
    let tick_interval = Duration::from_millis(config.timers.tick_interval_ms);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if EngineConfig::is_production() { "production" } else { "development" },
        "Starting FitTrack session engine demo"
    );

    // Wire the stores and collaborators
    let clock = Arc::new(SystemClock);
    let state = EngineState::new(
        config,
        clock.clone(),
        Arc::new(InMemorySettingsRepository::default()),
    );
    state.settings.hydrate().await;

    let squat = Exercise {
        id: Uuid::new_v4(),
        name: "Back Squat".to_string(),
        category: "legs".to_string(),
    };
    let deadlift = Exercise {
        id: Uuid::new_v4(),
        name: "Romanian Deadlift".to_string(),
        category: "legs".to_string(),
    };
    let repo = Arc::new(InMemoryWorkoutRepository::with_exercises(vec![
        squat.clone(),
        deadlift.clone(),
    ]));
    let navigator = Arc::new(RecordingNavigator::default());
    let cues = Arc::new(RecordingCuePlayer::default());

    let bar = FloatingBar::new(state.clone(), cues.clone(), navigator.clone());
    bar.mount();
    bar.set_screen(Screen::Workout);

    // Open a fresh session and build it up
    let edit_session_id = EditSessionId::fresh();
    let mut session = WorkoutSession::open(
        state.clone(),
        repo.clone(),
        navigator.clone(),
        edit_session_id,
    )
    .await?;

    session.rename("Leg Day")?;
    for (exercise, weight, reps) in [(&squat, 100.0, 5), (&squat, 100.0, 5), (&deadlift, 80.0, 8)]
    {
        session.open_overlay(Overlay::AddSet {
            exercise_id: exercise.id,
            exercise_name: exercise.name.clone(),
        })?;
        session.save_set_data(SetInput { weight, reps })?;
    }
    info!(sets = session.workout().exercise_sets.len(), "workout built");

    // Mount the timer hooks and complete the first set
    let mut workout_timer =
        WorkoutTimer::mount(state.workout_timer.clone(), clock.clone(), edit_session_id);
    let mut rest_timer = RestTimer::mount(
        state.rest_timer.clone(),
        state.settings.clone(),
        cues.clone(),
        state.config.clone(),
    );

    let toggle = session.toggle_set_done(0)?;
    if toggle.now_done && toggle.breaktime_secs > 0 {
        // Shortened rest so the demo finishes quickly
        rest_timer.start(2);
    }

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.tick().await; // first tick fires immediately
    for _ in 0..3 {
        ticker.tick().await;
        workout_timer.tick();
        rest_timer.tick();
        info!(
            elapsed_secs = workout_timer.elapsed_secs(),
            rest_remaining_secs = rest_timer.displayed_secs(),
            "tick"
        );
    }
    info!(
        sounds = cues.sounds().len(),
        vibrations = cues.vibration_count(),
        "rest countdown completed"
    );

    // Minimize: the floating bar takes over on the home screen
    session.minimize();
    bar.set_screen(Screen::Home);
    if let Some(view) = bar.tick() {
        info!(
            elapsed_secs = view.elapsed_secs,
            sets = view.sets_count,
            "floating bar visible"
        );
    }

    // Finish, keeping a template copy
    session.toggle_set_done(1)?;
    session.toggle_set_done(2)?;
    let outcome = session.finish(true).await?;

    info!(
        history_headers = repo.headers_of_kind(fittrack_shared::WorkoutKind::History).len(),
        template_headers = repo.headers_of_kind(fittrack_shared::WorkoutKind::Template).len(),
        "commit complete"
    );
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if EngineConfig::is_production() {
            "fittrack_engine=info".into()
        } else {
            "fittrack_engine=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if EngineConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
