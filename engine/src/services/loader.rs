//! Workout loading and reconciliation
//!
//! One mount of the workout screen merges three sources into a single
//! authoritative in-memory workout, most specific first:
//!
//! 1. a pending draft for the edit-session id (the user's latest unsaved
//!    intent, never silently overwritten by a reload),
//! 2. otherwise the persisted workout, with every `is_done` forced back to
//!    false (only a live session or draft may carry done-state),
//! 3. otherwise a synthesized empty workout.
//!
//! Independently of which source wins the body, the `start_time` anchor is
//! preserved from the Active-Session store when its id matches, so the
//! elapsed timer survives screen remounts.

use crate::error::EngineResult;
use crate::repositories::WorkoutRepository;
use crate::state::EngineState;
use chrono::{DateTime, Utc};
use fittrack_shared::{ActiveSession, EditSessionId, Exercise, Workout};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Pure merge of persisted data, draft, and live anchors
///
/// Idempotent: identical inputs yield an identical workout, no matter how
/// often remount-happy navigation re-runs it.
pub(crate) fn reconcile(
    edit_session_id: EditSessionId,
    persisted: Option<Workout>,
    draft: Option<Workout>,
    active: Option<&ActiveSession>,
    exercises: &HashMap<Uuid, Exercise>,
    now: DateTime<Utc>,
) -> Workout {
    let mut workout = if let Some(draft) = draft {
        draft
    } else if let Some(mut persisted) = persisted {
        persisted.reset_done_flags();
        persisted
    } else {
        Workout::empty(now)
    };

    // Backfill denormalized names for sets referencing not-yet-copied exercises
    for set in &mut workout.exercise_sets {
        if set.exercise_name.is_empty() {
            if let Some(exercise) = exercises.get(&set.exercise_id) {
                set.exercise_name = exercise.name.clone();
            }
        }
    }

    workout.start_time = Some(match active {
        Some(active) if active.id == edit_session_id => active.start_time,
        _ => now,
    });

    workout
}

/// Resolve all loader inputs for one mount and run the merge
pub async fn load_workout_session(
    repo: &dyn WorkoutRepository,
    state: &EngineState,
    edit_session_id: EditSessionId,
) -> EngineResult<Workout> {
    let draft = state.drafts.get(&edit_session_id);
    let persisted = if draft.is_some() {
        None
    } else {
        repo.load_workout(edit_session_id.0).await?
    };

    let needs_backfill = |workout: &Workout| {
        workout
            .exercise_sets
            .iter()
            .any(|set| set.exercise_name.is_empty())
    };
    let exercises = match (&draft, &persisted) {
        (Some(workout), _) | (_, Some(workout)) if needs_backfill(workout) => {
            repo.load_all_exercises().await?
        }
        _ => HashMap::new(),
    };

    let active = state.active_session.get();
    let workout = reconcile(
        edit_session_id,
        persisted,
        draft,
        active.as_ref(),
        &exercises,
        state.clock.now(),
    );
    debug!(
        %edit_session_id,
        sets = workout.exercise_sets.len(),
        resumed = active.map(|a| a.id == edit_session_id).unwrap_or(false),
        "workout reconciled"
    );
    Ok(workout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fittrack_shared::{ExerciseSet, DEFAULT_BREAKTIME_SECS};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn persisted_workout() -> Workout {
        let mut workout = Workout::empty(t0() - chrono::Duration::days(7));
        workout.id = Some(Uuid::from_u128(1));
        workout.name = Some("Leg Day".to_string());
        let mut set = ExerciseSet::new(
            Uuid::from_u128(10),
            "Back Squat",
            100.0,
            5,
            DEFAULT_BREAKTIME_SECS,
        );
        set.is_done = true;
        workout.exercise_sets.push(set);
        workout
    }

    fn draft_workout() -> Workout {
        let mut workout = persisted_workout();
        workout.name = Some("Leg Day (edited)".to_string());
        workout
    }

    #[test]
    fn draft_wins_outright_over_persisted() {
        let id = EditSessionId(Uuid::from_u128(1));
        let result = reconcile(
            id,
            Some(persisted_workout()),
            Some(draft_workout()),
            None,
            &HashMap::new(),
            t0(),
        );

        assert_eq!(result.name.as_deref(), Some("Leg Day (edited)"));
        // The draft body is taken verbatim, never merged with the reload
        assert!(result.exercise_sets[0].is_done);
    }

    #[test]
    fn persisted_load_resets_done_flags() {
        let id = EditSessionId(Uuid::from_u128(1));
        let result = reconcile(
            id,
            Some(persisted_workout()),
            None,
            None,
            &HashMap::new(),
            t0(),
        );

        assert_eq!(result.name.as_deref(), Some("Leg Day"));
        assert!(result.exercise_sets.iter().all(|set| !set.is_done));
    }

    #[test]
    fn missing_everything_synthesizes_an_empty_workout() {
        let id = EditSessionId::fresh();
        let result = reconcile(id, None, None, None, &HashMap::new(), t0());

        assert_eq!(result.date, t0());
        assert!(result.exercise_sets.is_empty());
        assert_eq!(result.name, None);
        assert_eq!(result.start_time, Some(t0()));
    }

    #[test]
    fn matching_active_session_preserves_start_time() {
        let id = EditSessionId(Uuid::from_u128(1));
        let started = t0() - chrono::Duration::seconds(65);
        let active = ActiveSession {
            id,
            start_time: started,
            sets_count: 1,
        };

        let result = reconcile(
            id,
            Some(persisted_workout()),
            None,
            Some(&active),
            &HashMap::new(),
            t0(),
        );
        assert_eq!(result.start_time, Some(started));
    }

    #[test]
    fn mismatched_active_session_gets_fresh_start_time() {
        let id = EditSessionId(Uuid::from_u128(1));
        let active = ActiveSession {
            id: EditSessionId(Uuid::from_u128(2)),
            start_time: t0() - chrono::Duration::seconds(65),
            sets_count: 1,
        };

        let result = reconcile(
            id,
            Some(persisted_workout()),
            None,
            Some(&active),
            &HashMap::new(),
            t0(),
        );
        assert_eq!(result.start_time, Some(t0()));
    }

    #[test]
    fn exercise_names_are_backfilled_from_metadata() {
        let id = EditSessionId::fresh();
        let exercise_id = Uuid::from_u128(42);
        let mut draft = Workout::empty(t0());
        draft.exercise_sets.push(ExerciseSet::new(
            exercise_id,
            "",
            60.0,
            8,
            DEFAULT_BREAKTIME_SECS,
        ));

        let mut exercises = HashMap::new();
        exercises.insert(
            exercise_id,
            Exercise {
                id: exercise_id,
                name: "Romanian Deadlift".to_string(),
                category: "legs".to_string(),
            },
        );

        let result = reconcile(id, None, Some(draft), None, &exercises, t0());
        assert_eq!(result.exercise_sets[0].exercise_name, "Romanian Deadlift");
    }

    #[test]
    fn reconcile_is_idempotent() {
        let id = EditSessionId(Uuid::from_u128(1));
        let active = ActiveSession {
            id,
            start_time: t0() - chrono::Duration::seconds(120),
            sets_count: 1,
        };

        let run = || {
            reconcile(
                id,
                Some(persisted_workout()),
                Some(draft_workout()),
                Some(&active),
                &HashMap::new(),
                t0(),
            )
        };
        assert_eq!(run(), run());

        // Feeding the output back through with unchanged inputs changes nothing
        let first = run();
        let second = reconcile(
            id,
            Some(persisted_workout()),
            Some(first.clone()),
            Some(&active),
            &HashMap::new(),
            t0(),
        );
        assert_eq!(first, second);
    }
}
