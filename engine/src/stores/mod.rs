//! Process-wide singleton stores
//!
//! Every store here is constructed once at startup, shared by reference
//! ([`std::sync::Arc`]) with every mounted screen, and mutated only from the
//! UI thread. Notifying stores invoke their subscribers synchronously on
//! every mutation, after the internal lock has been released, so a callback
//! may safely re-read the store.

pub mod active_session;
pub mod draft;
pub mod rest_timer;
pub mod settings;
pub mod workout_timer;

pub use active_session::ActiveSessionStore;
pub use draft::DraftStore;
pub use rest_timer::RestTimerStore;
pub use settings::SettingsStore;
pub use workout_timer::WorkoutTimerStore;

use std::sync::Arc;

/// Callback invoked with the store's new value on every mutation
pub type Listener<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

/// Handle for removing a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Subscriber registry shared by the notifying stores
pub(crate) struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Listeners<T> {
    pub(crate) fn add(&mut self, listener: Listener<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        SubscriptionId(id)
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id.0);
    }

    /// Clone the callbacks so they can run outside the store lock
    pub(crate) fn snapshot(&self) -> Vec<Listener<T>> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}
