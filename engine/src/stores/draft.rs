//! In-progress workout edits, keyed by edit-session id
//!
//! Pure synchronous map. Deliberately has no subscription mechanism: drafts
//! are read once at mount/reconciliation time to seed state, they do not
//! drive re-renders. Multiple drafts may coexist (editing a template while a
//! separate temp workout is being built).

use fittrack_shared::{EditSessionId, Workout};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

pub struct DraftStore {
    drafts: Mutex<HashMap<EditSessionId, Workout>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
        }
    }

    /// Last writer wins; in-process writes are serialized by the session
    /// hook's mutation choke point
    pub fn set(&self, id: EditSessionId, workout: Workout) {
        debug!(%id, sets = workout.exercise_sets.len(), "draft updated");
        self.drafts.lock().unwrap().insert(id, workout);
    }

    pub fn get(&self, id: &EditSessionId) -> Option<Workout> {
        self.drafts.lock().unwrap().get(id).cloned()
    }

    pub fn clear(&self, id: &EditSessionId) {
        debug!(%id, "draft cleared");
        self.drafts.lock().unwrap().remove(id);
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.lock().unwrap().is_empty()
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn draft(name: &str) -> Workout {
        let mut workout = Workout::empty(Utc::now());
        workout.name = Some(name.to_string());
        workout
    }

    #[test]
    fn drafts_for_different_sessions_coexist() {
        let store = DraftStore::new();
        let a = EditSessionId::fresh();
        let b = EditSessionId::fresh();

        store.set(a, draft("Template edit"));
        store.set(b, draft("New workout"));

        assert_eq!(store.get(&a).unwrap().name.as_deref(), Some("Template edit"));
        assert_eq!(store.get(&b).unwrap().name.as_deref(), Some("New workout"));
    }

    #[test]
    fn clear_removes_only_the_given_session() {
        let store = DraftStore::new();
        let a = EditSessionId::fresh();
        let b = EditSessionId::fresh();

        store.set(a, draft("A"));
        store.set(b, draft("B"));
        store.clear(&a);

        assert_eq!(store.get(&a), None);
        assert!(store.get(&b).is_some());
        assert!(!store.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let store = DraftStore::new();
        let id = EditSessionId::fresh();

        store.set(id, draft("first"));
        store.set(id, draft("second"));

        assert_eq!(store.get(&id).unwrap().name.as_deref(), Some("second"));
    }
}
