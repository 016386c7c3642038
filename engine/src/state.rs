//! Engine state wiring
//!
//! All process-wide stores are constructed once at startup and handed to
//! hooks and screens by reference. Nothing here is a hidden module-level
//! global: tests build a fresh, fully isolated [`EngineState`] per case.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::repositories::SettingsRepository;
use crate::stores::{
    ActiveSessionStore, DraftStore, RestTimerStore, SettingsStore, WorkoutTimerStore,
};
use std::sync::Arc;

/// Shared engine state
///
/// All fields are `Arc`s; cloning is O(1).
#[derive(Clone)]
pub struct EngineState {
    pub config: Arc<EngineConfig>,
    pub clock: Arc<dyn Clock>,
    pub active_session: Arc<ActiveSessionStore>,
    pub rest_timer: Arc<RestTimerStore>,
    pub workout_timer: Arc<WorkoutTimerStore>,
    pub drafts: Arc<DraftStore>,
    pub settings: Arc<SettingsStore>,
}

impl EngineState {
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        settings_repo: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            clock: clock.clone(),
            active_session: Arc::new(ActiveSessionStore::new()),
            rest_timer: Arc::new(RestTimerStore::new(clock)),
            workout_timer: Arc::new(WorkoutTimerStore::new()),
            drafts: Arc::new(DraftStore::new()),
            settings: Arc::new(SettingsStore::new(settings_repo)),
        }
    }
}
