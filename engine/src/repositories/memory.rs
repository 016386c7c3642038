//! In-memory backing store
//!
//! Mirrors the record shape of the hosted database: one header record per
//! committed workout plus one record per exercise set. Commits stage the
//! whole batch first and apply it only once every record is built, so an
//! injected failure leaves zero partial records behind.

use super::{SettingsRepository, WorkoutRepository};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fittrack_shared::{Exercise, ExerciseSet, UserSettings, Workout, WorkoutKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Workout header record as persisted
#[derive(Debug, Clone)]
pub struct WorkoutHeaderRecord {
    pub id: Uuid,
    pub name: String,
    pub kind: WorkoutKind,
    pub date: DateTime<Utc>,
    pub duration_secs: Option<i64>,
    /// Set record ids in display order
    pub set_ids: Vec<Uuid>,
}

/// Exercise set record as persisted
#[derive(Debug, Clone)]
pub struct ExerciseSetRecord {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub breaktime_secs: u32,
    pub is_done: bool,
}

pub struct InMemoryWorkoutRepository {
    headers: Mutex<HashMap<Uuid, WorkoutHeaderRecord>>,
    sets: Mutex<HashMap<Uuid, ExerciseSetRecord>>,
    exercises: Mutex<HashMap<Uuid, Exercise>>,
    fail_next_commit: AtomicBool,
    fail_kind: Mutex<Option<WorkoutKind>>,
}

impl InMemoryWorkoutRepository {
    pub fn new() -> Self {
        Self {
            headers: Mutex::new(HashMap::new()),
            sets: Mutex::new(HashMap::new()),
            exercises: Mutex::new(HashMap::new()),
            fail_next_commit: AtomicBool::new(false),
            fail_kind: Mutex::new(None),
        }
    }

    /// Seed the exercise metadata lookup
    pub fn with_exercises(exercises: Vec<Exercise>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.exercises.lock().unwrap();
            for exercise in exercises {
                map.insert(exercise.id, exercise);
            }
        }
        repo
    }

    /// Make the next commit_workout call fail before applying anything
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Make the next commit of the given kind fail; other kinds pass through
    pub fn fail_next_commit_of_kind(&self, kind: WorkoutKind) {
        *self.fail_kind.lock().unwrap() = Some(kind);
    }

    pub fn header_count(&self) -> usize {
        self.headers.lock().unwrap().len()
    }

    pub fn set_count(&self) -> usize {
        self.sets.lock().unwrap().len()
    }

    pub fn headers_of_kind(&self, kind: WorkoutKind) -> Vec<WorkoutHeaderRecord> {
        self.headers
            .lock()
            .unwrap()
            .values()
            .filter(|header| header.kind == kind)
            .cloned()
            .collect()
    }

    pub fn sets_of(&self, workout_id: Uuid) -> Vec<ExerciseSetRecord> {
        let headers = self.headers.lock().unwrap();
        let sets = self.sets.lock().unwrap();
        headers
            .get(&workout_id)
            .map(|header| {
                header
                    .set_ids
                    .iter()
                    .filter_map(|id| sets.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for InMemoryWorkoutRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    async fn load_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        let headers = self.headers.lock().unwrap();
        let Some(header) = headers.get(&id) else {
            return Ok(None);
        };

        let sets = self.sets.lock().unwrap();
        let exercise_sets = header
            .set_ids
            .iter()
            .filter_map(|set_id| sets.get(set_id))
            .map(|record| ExerciseSet {
                id: record.id,
                exercise_id: record.exercise_id,
                exercise_name: record.exercise_name.clone(),
                weight: record.weight,
                reps: record.reps,
                breaktime_secs: record.breaktime_secs,
                is_done: record.is_done,
            })
            .collect();

        Ok(Some(Workout {
            id: Some(header.id),
            name: Some(header.name.clone()),
            date: header.date,
            start_time: None,
            duration_secs: header.duration_secs,
            exercise_sets,
            kind: Some(header.kind),
        }))
    }

    async fn load_all_exercises(&self) -> Result<HashMap<Uuid, Exercise>> {
        Ok(self.exercises.lock().unwrap().clone())
    }

    async fn commit_workout(&self, workout: &Workout, kind: WorkoutKind) -> Result<Uuid> {
        let name = workout
            .name
            .clone()
            .ok_or_else(|| anyhow!("workout name missing"))?;

        // Stage the full batch before touching the record maps
        let workout_id = Uuid::new_v4();
        let set_records: Vec<ExerciseSetRecord> = workout
            .exercise_sets
            .iter()
            .map(|set| ExerciseSetRecord {
                id: Uuid::new_v4(),
                workout_id,
                exercise_id: set.exercise_id,
                exercise_name: set.exercise_name.clone(),
                weight: set.weight,
                reps: set.reps,
                breaktime_secs: set.breaktime_secs,
                is_done: set.is_done,
            })
            .collect();
        let header = WorkoutHeaderRecord {
            id: workout_id,
            name,
            kind,
            date: workout.date,
            duration_secs: workout.duration_secs,
            set_ids: set_records.iter().map(|record| record.id).collect(),
        };

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            bail!("batched write failed");
        }
        {
            let mut fail_kind = self.fail_kind.lock().unwrap();
            if *fail_kind == Some(kind) {
                *fail_kind = None;
                bail!("batched write failed");
            }
        }

        let mut headers = self.headers.lock().unwrap();
        let mut sets = self.sets.lock().unwrap();
        for record in set_records {
            sets.insert(record.id, record);
        }
        headers.insert(workout_id, header);
        debug!(%workout_id, ?kind, "workout committed");

        Ok(workout_id)
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: Mutex<Option<UserSettings>>,
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Option<UserSettings>> {
        Ok(*self.settings.lock().unwrap())
    }

    async fn save(&self, settings: &UserSettings) -> Result<()> {
        *self.settings.lock().unwrap() = Some(*settings);
        Ok(())
    }
}
