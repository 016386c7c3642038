//! Data models for the FitTrack workout session engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Default rest period between sets, in seconds
pub const DEFAULT_BREAKTIME_SECS: u32 = 30;

/// Record type assigned to a workout at commit time, never before
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    /// Reusable plan the user can start future sessions from
    Template,
    /// A completed training session
    History,
}

/// One planned or performed set
///
/// Sets are owned by exactly one [`Workout`]; reordering or removal always
/// goes through the owning workout's set list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub exercise_id: Uuid,
    /// Denormalized display copy of the exercise name
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub breaktime_secs: u32,
    pub is_done: bool,
}

impl ExerciseSet {
    /// Create a new set with a locally generated id, not yet done
    pub fn new(
        exercise_id: Uuid,
        exercise_name: impl Into<String>,
        weight: f64,
        reps: u32,
        breaktime_secs: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id,
            exercise_name: exercise_name.into(),
            weight,
            reps,
            breaktime_secs,
            is_done: false,
        }
    }
}

/// One training session or template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Workout {
    /// Absent until the workout has been persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Optional until the user names it; required before commit
    #[validate(
        required(message = "Workout name is required"),
        length(min = 1, message = "Workout name cannot be empty")
    )]
    pub name: Option<String>,
    /// Creation/occurrence timestamp
    pub date: DateTime<Utc>,
    /// Elapsed-time anchor, present only while the session is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Computed at finish time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,
    /// Display/grouping order; not semantically significant beyond insertion
    #[validate(length(min = 1, message = "Workout needs at least one set"))]
    pub exercise_sets: Vec<ExerciseSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkoutKind>,
}

impl Workout {
    /// Synthesize an empty, unnamed workout dated `now`
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: None,
            date: now,
            start_time: None,
            duration_secs: None,
            exercise_sets: Vec::new(),
            kind: None,
        }
    }

    /// Reset every set to not-done
    pub fn reset_done_flags(&mut self) {
        for set in &mut self.exercise_sets {
            set.is_done = false;
        }
    }
}

/// Identifies one editing attempt on a workout
///
/// Derived from an existing workout's id, or freshly generated for a workout
/// that has never been persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EditSessionId(pub Uuid);

impl EditSessionId {
    /// Key for editing an already-persisted workout
    pub fn for_workout(workout_id: Uuid) -> Self {
        Self(workout_id)
    }

    /// Key for a brand-new workout
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EditSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The workout currently open somewhere in the app, including minimized
///
/// `start_time` is the single source of truth for elapsed duration; consumers
/// derive elapsed by timestamp subtraction, never by counting ticks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveSession {
    pub id: EditSessionId,
    pub start_time: DateTime<Utc>,
    pub sets_count: usize,
}

/// An armed rest countdown; only the end instant is stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RestTimerAnchor {
    pub end_time: DateTime<Utc>,
}

/// Rest countdown state derived from the anchor at read time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTimerState {
    pub time_remaining_secs: i64,
    pub is_active: bool,
}

/// Elapsed-timer anchor for one workout session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTimerAnchor {
    pub start_time: DateTime<Utc>,
    pub elapsed_secs: u64,
    pub workout_id: EditSessionId,
}

/// Read-only exercise metadata, owned externally
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

/// User preferences consumed by the timer-completion cues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub auto_brightness: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            auto_brightness: false,
        }
    }
}
