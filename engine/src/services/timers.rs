//! Per-screen timer hooks
//!
//! Both hooks are driven by a host-scheduled one-second tick; neither owns a
//! background task. Display values are derived from the anchor stores by
//! wall-clock subtraction, so a tick that arrives late (or not at all while
//! the app is suspended) never accumulates drift.

use crate::clock::{elapsed_secs, Clock};
use crate::config::EngineConfig;
use crate::cues::{fire_rest_cues, CuePlayer};
use crate::stores::{RestTimerStore, SettingsStore, WorkoutTimerStore};
use chrono::Duration;
use fittrack_shared::{EditSessionId, WorkoutTimerAnchor};
use std::sync::Arc;
use tracing::debug;

/// Elapsed-workout-duration hook for one mounted workout screen
///
/// Re-anchors the store on every tick, so if the screen is torn down
/// mid-session the stored anchor is never more than about a second stale.
/// Dropping the hook deliberately leaves the store untouched: elapsed time
/// survives unmount.
pub struct WorkoutTimer {
    store: Arc<WorkoutTimerStore>,
    clock: Arc<dyn Clock>,
    workout_id: EditSessionId,
    elapsed_secs: u64,
}

impl WorkoutTimer {
    /// Mount the hook, resuming from a matching anchor or starting at zero
    pub fn mount(
        store: Arc<WorkoutTimerStore>,
        clock: Arc<dyn Clock>,
        workout_id: EditSessionId,
    ) -> Self {
        let elapsed_secs = match store.get() {
            Some(anchor) if anchor.workout_id == workout_id => {
                elapsed_secs(anchor.start_time, clock.now()) as u64
            }
            // A different workout's anchor means no existing timer
            _ => 0,
        };
        debug!(%workout_id, elapsed_secs, "workout timer mounted");
        Self {
            store,
            clock,
            workout_id,
            elapsed_secs,
        }
    }

    /// One-second tick: advance the displayed counter and re-anchor the store
    pub fn tick(&mut self) {
        self.elapsed_secs += 1;
        let now = self.clock.now();
        self.store.set(WorkoutTimerAnchor {
            start_time: now - Duration::seconds(self.elapsed_secs as i64),
            elapsed_secs: self.elapsed_secs,
            workout_id: self.workout_id,
        });
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }
}

/// Rest-countdown hook for one mounted consumer
///
/// Tracks its own last displayed remaining so the completion cue is
/// edge-triggered: it fires exactly once when the countdown crosses zero,
/// not on every observation of zero.
pub struct RestTimer {
    store: Arc<RestTimerStore>,
    settings: Arc<SettingsStore>,
    cues: Arc<dyn CuePlayer>,
    config: Arc<EngineConfig>,
    displayed_secs: i64,
}

impl RestTimer {
    /// Mount the hook; an already-armed countdown is picked up immediately,
    /// which is how the rest timer follows the user across screens
    pub fn mount(
        store: Arc<RestTimerStore>,
        settings: Arc<SettingsStore>,
        cues: Arc<dyn CuePlayer>,
        config: Arc<EngineConfig>,
    ) -> Self {
        let state = store.state();
        Self {
            store,
            settings,
            cues,
            config,
            displayed_secs: state.time_remaining_secs,
        }
    }

    /// Arm the countdown and seed the displayed remaining
    pub fn start(&mut self, seconds: u32) {
        self.store.start(seconds);
        self.displayed_secs = seconds as i64;
    }

    /// One-second tick: refresh the displayed remaining, firing the
    /// completion cue on the transition to zero
    pub fn tick(&mut self) {
        let state = self.store.state();
        if state.is_active {
            self.displayed_secs = state.time_remaining_secs;
            return;
        }
        // Only a spent anchor is an expiry; a cleared store means another
        // screen dismissed or finished the session, and that must not cue
        if self.displayed_secs > 0 && self.store.anchor().is_some() {
            fire_rest_cues(
                &self.settings.get(),
                self.cues.as_ref(),
                &self.config.cues.vibration_pattern,
            );
            debug!("rest countdown finished");
        }
        self.displayed_secs = 0;
    }

    /// Dismiss the countdown; callable whether or not one is running
    pub fn stop(&mut self) {
        self.displayed_secs = 0;
        self.store.clear();
    }

    pub fn displayed_secs(&self) -> i64 {
        self.displayed_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::cues::RecordingCuePlayer;
    use crate::repositories::InMemorySettingsRepository;
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    fn rest_timer(clock: Arc<ManualClock>) -> (RestTimer, Arc<RestTimerStore>, Arc<RecordingCuePlayer>) {
        let store = Arc::new(RestTimerStore::new(clock));
        let cues = Arc::new(RecordingCuePlayer::default());
        let timer = RestTimer::mount(
            store.clone(),
            Arc::new(SettingsStore::new(Arc::new(
                InMemorySettingsRepository::default(),
            ))),
            cues.clone(),
            Arc::new(EngineConfig::default()),
        );
        (timer, store, cues)
    }

    #[test]
    fn elapsed_survives_unmount_and_remount() {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(WorkoutTimerStore::new());
        let id = EditSessionId::fresh();

        let mut timer = WorkoutTimer::mount(store.clone(), clock.clone(), id);
        for _ in 0..65 {
            clock.advance_secs(1);
            timer.tick();
        }
        assert_eq!(timer.elapsed_secs(), 65);
        drop(timer);

        // The anchor survived the unmount
        assert_eq!(store.get().unwrap().elapsed_secs, 65);

        let remounted = WorkoutTimer::mount(store, clock, id);
        assert_eq!(remounted.elapsed_secs(), 65);
    }

    #[test]
    fn mismatched_anchor_means_start_at_zero() {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(WorkoutTimerStore::new());

        let mut timer = WorkoutTimer::mount(store.clone(), clock.clone(), EditSessionId::fresh());
        clock.advance_secs(1);
        timer.tick();

        let other = WorkoutTimer::mount(store, clock, EditSessionId::fresh());
        assert_eq!(other.elapsed_secs(), 0);
    }

    #[test]
    fn re_anchoring_keeps_the_store_fresh_every_tick() {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(WorkoutTimerStore::new());
        let id = EditSessionId::fresh();

        let mut timer = WorkoutTimer::mount(store.clone(), clock.clone(), id);
        clock.advance_secs(1);
        timer.tick();
        let first = store.get().unwrap();
        clock.advance_secs(1);
        timer.tick();
        let second = store.get().unwrap();

        assert_eq!(first.elapsed_secs, 1);
        assert_eq!(second.elapsed_secs, 2);
        // start_time stays consistent: now - elapsed
        assert_eq!(second.start_time, t0());
    }

    #[test]
    fn rest_expiry_fires_the_cue_exactly_once() {
        let clock = Arc::new(ManualClock::new(t0()));
        let (mut timer, _store, cues) = rest_timer(clock.clone());

        timer.start(30);
        clock.advance_secs(10);
        timer.tick();
        assert_eq!(timer.displayed_secs(), 20);
        assert!(cues.sounds().is_empty());

        clock.advance_secs(20);
        timer.tick();
        assert_eq!(timer.displayed_secs(), 0);
        assert_eq!(cues.sounds().len(), 1);
        assert_eq!(cues.vibration_count(), 1);

        // Further observations of zero stay silent
        clock.advance_secs(5);
        timer.tick();
        timer.tick();
        assert_eq!(cues.sounds().len(), 1);
    }

    #[test]
    fn stop_is_idempotent_and_never_cues() {
        let clock = Arc::new(ManualClock::new(t0()));
        let (mut timer, store, cues) = rest_timer(clock.clone());

        timer.stop();
        assert_eq!(timer.displayed_secs(), 0);

        timer.start(30);
        clock.advance_secs(5);
        timer.tick();
        timer.stop();
        timer.stop();

        assert!(store.anchor().is_none());
        timer.tick();
        assert!(cues.sounds().is_empty());
    }

    #[test]
    fn external_clear_does_not_fire_a_late_cue() {
        let clock = Arc::new(ManualClock::new(t0()));
        let (mut timer, store, cues) = rest_timer(clock.clone());

        timer.start(30);
        clock.advance_secs(5);
        timer.tick();
        assert_eq!(timer.displayed_secs(), 25);

        // Finish/discard on another screen clears the store
        store.clear();
        timer.tick();

        assert_eq!(timer.displayed_secs(), 0);
        assert!(cues.sounds().is_empty());
    }

    #[test]
    fn mount_resumes_an_armed_countdown() {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(RestTimerStore::new(clock.clone()));
        store.start(30);
        clock.advance_secs(12);

        let settings = Arc::new(SettingsStore::new(Arc::new(
            InMemorySettingsRepository::default(),
        )));
        let timer = RestTimer::mount(
            store,
            settings,
            Arc::new(RecordingCuePlayer::default()),
            Arc::new(EngineConfig::default()),
        );
        assert_eq!(timer.displayed_secs(), 18);
    }
}
