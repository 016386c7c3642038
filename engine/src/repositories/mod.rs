//! Backing-store collaborators
//!
//! The engine never talks to durable storage directly; it goes through these
//! traits. The real app binds them to its hosted document database, tests
//! and the demo binary bind them to the in-memory implementations.

pub mod memory;

pub use memory::{
    ExerciseSetRecord, InMemorySettingsRepository, InMemoryWorkoutRepository, WorkoutHeaderRecord,
};

use anyhow::Result;
use async_trait::async_trait;
use fittrack_shared::{Exercise, UserSettings, Workout, WorkoutKind};
use std::collections::HashMap;
use uuid::Uuid;

/// Workout persistence collaborator
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn load_workout(&self, id: Uuid) -> Result<Option<Workout>>;

    /// Read-only exercise metadata, used to backfill denormalized names
    async fn load_all_exercises(&self) -> Result<HashMap<Uuid, Exercise>>;

    /// Persist one workout as a record of the given kind
    ///
    /// The write must be atomic over the workout header and all of its
    /// exercise-set records: all of them land, or none of them do.
    async fn commit_workout(&self, workout: &Workout, kind: WorkoutKind) -> Result<Uuid>;
}

/// User-settings persistence collaborator
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load(&self) -> Result<Option<UserSettings>>;
    async fn save(&self, settings: &UserSettings) -> Result<()>;
}
