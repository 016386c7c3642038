//! Elapsed-workout-time anchor
//!
//! Lets a freshly mounted timer hook recompute the in-progress elapsed
//! duration for the *same* workout. A mismatched workout id means a different
//! workout became active; consumers treat that as "no existing timer".

use fittrack_shared::WorkoutTimerAnchor;
use std::sync::Mutex;

pub struct WorkoutTimerStore {
    anchor: Mutex<Option<WorkoutTimerAnchor>>,
}

impl WorkoutTimerStore {
    pub fn new() -> Self {
        Self {
            anchor: Mutex::new(None),
        }
    }

    pub fn set(&self, anchor: WorkoutTimerAnchor) {
        *self.anchor.lock().unwrap() = Some(anchor);
    }

    pub fn get(&self) -> Option<WorkoutTimerAnchor> {
        *self.anchor.lock().unwrap()
    }

    pub fn clear(&self) {
        *self.anchor.lock().unwrap() = None;
    }
}

impl Default for WorkoutTimerStore {
    fn default() -> Self {
        Self::new()
    }
}
