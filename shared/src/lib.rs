//! FitTrack Shared Library
//!
//! This crate contains the domain types and validation helpers shared by the
//! session engine and any client embedding it.

pub mod models;
pub mod validation;

// Re-export commonly used items
pub use models::{
    ActiveSession, EditSessionId, Exercise, ExerciseSet, RestTimerAnchor, RestTimerState,
    UserSettings, Workout, WorkoutKind, WorkoutTimerAnchor, DEFAULT_BREAKTIME_SECS,
};
