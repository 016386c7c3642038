//! Active workout session state machine
//!
//! One instance per open workout screen. Every mutation funnels through the
//! `update_workout` choke point, which updates the in-memory workout and
//! mirrors it into the draft store in the same call, so the draft can never
//! drift from what the screen displays.
//!
//! The hook mutates data only. Arming the rest timer after a set is marked
//! done is the caller's job, sequenced from the [`SetToggle`] this hook
//! returns; that keeps the pure data transition separately testable.

use crate::error::{EngineError, EngineResult};
use crate::navigation::{NavIntent, Navigator};
use crate::repositories::WorkoutRepository;
use crate::services::loader;
use crate::state::EngineState;
use fittrack_shared::{validation, ActiveSession, EditSessionId, ExerciseSet, Workout, WorkoutKind};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle phase of one open workout screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Loading,
    Viewing,
    Editing,
    Saving,
    Discarding,
}

/// Modal overlay currently targeting a set
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Edit the set at this index in place
    EditSet { index: usize },
    /// Append a new set for this exercise
    AddSet {
        exercise_id: Uuid,
        exercise_name: String,
    },
}

/// Weight/rep values captured by the set overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetInput {
    pub weight: f64,
    pub reps: u32,
}

/// Result of toggling a set's done flag
///
/// When `now_done` and `breaktime_secs > 0`, the caller arms the rest timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetToggle {
    pub now_done: bool,
    pub breaktime_secs: u32,
}

/// Outcome of a successful finish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishOutcome {
    pub history_id: Uuid,
    /// Present when a template copy was requested and committed
    pub template_id: Option<Uuid>,
    /// Present when the optional template copy failed; the history record
    /// stands regardless
    pub template_error: Option<String>,
}

pub struct WorkoutSession {
    state: EngineState,
    repo: Arc<dyn WorkoutRepository>,
    navigator: Arc<dyn Navigator>,
    edit_session_id: EditSessionId,
    workout: Workout,
    original: Option<Workout>,
    mode: SessionMode,
    overlay: Option<Overlay>,
    saving: bool,
}

impl WorkoutSession {
    /// Open a workout screen: reconcile persisted data, draft, and live
    /// anchors, then register the active-session anchor
    pub async fn open(
        state: EngineState,
        repo: Arc<dyn WorkoutRepository>,
        navigator: Arc<dyn Navigator>,
        edit_session_id: EditSessionId,
    ) -> EngineResult<Self> {
        let workout = loader::load_workout_session(repo.as_ref(), &state, edit_session_id).await?;
        let session = Self {
            state,
            repo,
            navigator,
            edit_session_id,
            workout,
            original: None,
            mode: SessionMode::Viewing,
            overlay: None,
            saving: false,
        };
        session.publish_active_session();
        info!(
            %edit_session_id,
            sets = session.workout.exercise_sets.len(),
            "workout session opened"
        );
        Ok(session)
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn edit_session_id(&self) -> EditSessionId {
        self.edit_session_id
    }

    /// Snapshot the workout so Cancel can restore it exactly
    pub fn enter_edit(&mut self) -> EngineResult<()> {
        if self.mode != SessionMode::Viewing {
            return Err(EngineError::Conflict(format!(
                "cannot start editing while {:?}",
                self.mode
            )));
        }
        self.original = Some(self.workout.clone());
        self.mode = SessionMode::Editing;
        Ok(())
    }

    /// Discard in-memory changes back to the snapshot; the restored snapshot
    /// is also written to the draft store so the discard survives reloads
    pub fn cancel_edit(&mut self) -> EngineResult<()> {
        if self.mode != SessionMode::Editing {
            return Err(EngineError::Conflict("no edit in progress".to_string()));
        }
        let snapshot = self
            .original
            .take()
            .ok_or_else(|| EngineError::Conflict("no snapshot to restore".to_string()))?;
        self.update_workout(snapshot);
        self.overlay = None;
        self.mode = SessionMode::Viewing;
        Ok(())
    }

    /// Keep the edits; a local commit only — the draft already holds every
    /// change, durable persistence happens at finish
    pub fn save_edits(&mut self) -> EngineResult<()> {
        if self.mode != SessionMode::Editing {
            return Err(EngineError::Conflict("no edit in progress".to_string()));
        }
        self.original = None;
        self.mode = SessionMode::Viewing;
        Ok(())
    }

    pub fn rename(&mut self, name: &str) -> EngineResult<()> {
        validation::validate_workout_name(name).map_err(EngineError::Validation)?;
        let mut workout = self.workout.clone();
        workout.name = Some(name.to_string());
        self.update_workout(workout);
        Ok(())
    }

    /// Toggle one set's done flag; never arms a timer itself
    pub fn toggle_set_done(&mut self, index: usize) -> EngineResult<SetToggle> {
        let mut workout = self.workout.clone();
        let set = workout
            .exercise_sets
            .get_mut(index)
            .ok_or_else(|| EngineError::NotFound(format!("no set at index {index}")))?;
        set.is_done = !set.is_done;
        let toggle = SetToggle {
            now_done: set.is_done,
            breaktime_secs: set.breaktime_secs,
        };
        self.update_workout(workout);
        Ok(toggle)
    }

    pub fn remove_set(&mut self, index: usize) -> EngineResult<()> {
        let mut workout = self.workout.clone();
        if index >= workout.exercise_sets.len() {
            return Err(EngineError::NotFound(format!("no set at index {index}")));
        }
        workout.exercise_sets.remove(index);
        self.update_workout(workout);
        Ok(())
    }

    /// Set the rest period for every set of one exercise
    pub fn save_break_time(&mut self, exercise_id: Uuid, seconds: u32) -> EngineResult<()> {
        validation::validate_breaktime(seconds).map_err(EngineError::Validation)?;
        let mut workout = self.workout.clone();
        let mut matched = false;
        for set in &mut workout.exercise_sets {
            if set.exercise_id == exercise_id {
                set.breaktime_secs = seconds;
                matched = true;
            }
        }
        if !matched {
            return Err(EngineError::NotFound(format!(
                "no sets for exercise {exercise_id}"
            )));
        }
        self.update_workout(workout);
        Ok(())
    }

    pub fn open_overlay(&mut self, overlay: Overlay) -> EngineResult<()> {
        if let Overlay::EditSet { index } = overlay {
            if index >= self.workout.exercise_sets.len() {
                return Err(EngineError::NotFound(format!("no set at index {index}")));
            }
        }
        self.overlay = Some(overlay);
        Ok(())
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Apply the overlay's captured values: edit the targeted set in place,
    /// or append a new set with the configured default rest period
    pub fn save_set_data(&mut self, input: SetInput) -> EngineResult<()> {
        let overlay = self
            .overlay
            .clone()
            .ok_or_else(|| EngineError::Validation("no set overlay is open".to_string()))?;
        validation::validate_weight(input.weight).map_err(EngineError::Validation)?;
        validation::validate_reps(input.reps).map_err(EngineError::Validation)?;

        let mut workout = self.workout.clone();
        match overlay {
            Overlay::EditSet { index } => {
                let set = workout
                    .exercise_sets
                    .get_mut(index)
                    .ok_or_else(|| EngineError::NotFound(format!("no set at index {index}")))?;
                set.weight = input.weight;
                set.reps = input.reps;
            }
            Overlay::AddSet {
                exercise_id,
                exercise_name,
            } => {
                workout.exercise_sets.push(ExerciseSet::new(
                    exercise_id,
                    exercise_name,
                    input.weight,
                    input.reps,
                    self.state.config.timers.default_breaktime_secs,
                ));
            }
        }
        self.update_workout(workout);
        self.overlay = None;
        Ok(())
    }

    /// Take sets emitted by the add-exercise screen into this session
    pub fn append_sets(&mut self, sets: Vec<ExerciseSet>) {
        if sets.is_empty() {
            return;
        }
        let mut workout = self.workout.clone();
        workout.exercise_sets.extend(sets);
        self.update_workout(workout);
    }

    /// Refresh the active-session anchor and hand control back to the host;
    /// the floating bar takes over from here
    pub fn minimize(&self) {
        self.publish_active_session();
        self.navigator.navigate(NavIntent::Home);
    }

    /// Drop the session. The UI confirms with the user before calling this;
    /// draft, session anchor and both timers are cleared as one unit.
    pub fn discard(&mut self) {
        self.mode = SessionMode::Discarding;
        self.clear_session_state();
        info!(edit_session_id = %self.edit_session_id, "workout discarded");
        self.navigator.navigate(NavIntent::Home);
    }

    /// Commit the workout to the backing store
    ///
    /// Always writes a `History` record; additionally writes an independent
    /// `Template` record when the user asked for one. Session state is
    /// cleared only after the history commit is confirmed, so a failed
    /// finish leaves everything resumable.
    pub async fn finish(&mut self, save_as_template: bool) -> EngineResult<FinishOutcome> {
        if self.saving {
            return Err(EngineError::Conflict(
                "a commit is already in flight".to_string(),
            ));
        }
        self.workout
            .validate()
            .map_err(|errors| EngineError::Validation(validation_message(&errors)))?;

        let previous_mode = self.mode;
        self.saving = true;
        self.mode = SessionMode::Saving;

        let now = self.state.clock.now();
        let mut record = self.workout.clone();
        record.duration_secs = record
            .start_time
            .map(|started| crate::clock::elapsed_secs(started, now));
        record.start_time = None;

        let history_id = match self.repo.commit_workout(&record, WorkoutKind::History).await {
            Ok(id) => id,
            Err(commit_error) => {
                error!(error = %commit_error, "history commit failed");
                self.saving = false;
                self.mode = previous_mode;
                return Err(EngineError::Commit(commit_error.to_string()));
            }
        };

        let (template_id, template_error) = if save_as_template {
            let mut template = record.clone();
            template.duration_secs = None;
            template.reset_done_flags();
            match self.repo.commit_workout(&template, WorkoutKind::Template).await {
                Ok(id) => (Some(id), None),
                Err(commit_error) => {
                    error!(error = %commit_error, "template commit failed");
                    (None, Some(commit_error.to_string()))
                }
            }
        } else {
            (None, None)
        };

        self.clear_session_state();
        self.saving = false;
        info!(%history_id, template = template_id.is_some(), "workout finished");
        self.navigator.navigate(NavIntent::Home);

        Ok(FinishOutcome {
            history_id,
            template_id,
            template_error,
        })
    }

    /// The mutation choke point: in-memory state and the draft entry change
    /// together or not at all
    fn update_workout(&mut self, workout: Workout) {
        self.workout = workout;
        self.state
            .drafts
            .set(self.edit_session_id, self.workout.clone());
    }

    fn publish_active_session(&self) {
        let start_time = self
            .workout
            .start_time
            .unwrap_or_else(|| self.state.clock.now());
        self.state.active_session.set(Some(ActiveSession {
            id: self.edit_session_id,
            start_time,
            sets_count: self.workout.exercise_sets.len(),
        }));
    }

    /// A partial clear would let a stale draft resurrect a finished session,
    /// so everything goes in one call
    fn clear_session_state(&self) {
        self.state.drafts.clear(&self.edit_session_id);
        self.state.active_session.clear();
        self.state.rest_timer.clear();
        self.state.workout_timer.clear();
    }
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .collect::<Vec<_>>()
        .join("; ")
}
