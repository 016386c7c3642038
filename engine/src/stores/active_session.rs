//! Active workout session anchor
//!
//! Nullable singleton describing the workout currently open somewhere in the
//! app. Set when a session opens or is minimized, cleared on finish/discard;
//! it drives the visibility of the cross-screen resumption bar.

use super::{Listener, Listeners, SubscriptionId};
use fittrack_shared::ActiveSession;
use std::sync::Mutex;
use tracing::debug;

pub struct ActiveSessionStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    current: Option<ActiveSession>,
    listeners: Listeners<ActiveSession>,
}

impl ActiveSessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replace the anchor and synchronously notify every subscriber,
    /// including with `None`
    pub fn set(&self, session: Option<ActiveSession>) {
        let (value, listeners) = {
            let mut inner = self.inner.lock().unwrap();
            inner.current = session;
            (inner.current.clone(), inner.listeners.snapshot())
        };
        debug!(active = value.is_some(), "active session updated");
        for listener in listeners {
            listener(value.as_ref());
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn get(&self) -> Option<ActiveSession> {
        self.inner.lock().unwrap().current.clone()
    }

    pub fn subscribe(&self, listener: Listener<ActiveSession>) -> SubscriptionId {
        self.inner.lock().unwrap().listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unwrap().listeners.remove(id);
    }
}

impl Default for ActiveSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fittrack_shared::EditSessionId;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    fn session(seed: u8) -> ActiveSession {
        ActiveSession {
            id: EditSessionId(Uuid::from_u128(seed as u128)),
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            sets_count: seed as usize,
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = ActiveSessionStore::new();
        assert_eq!(store.get(), None);

        store.set(Some(session(1)));
        assert_eq!(store.get(), Some(session(1)));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn every_mutation_notifies_subscribers() {
        let store = ActiveSessionStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen_none = Arc::new(AtomicUsize::new(0));

        let calls_ref = Arc::clone(&calls);
        let none_ref = Arc::clone(&seen_none);
        store.subscribe(Arc::new(move |value| {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            if value.is_none() {
                none_ref.fetch_add(1, Ordering::SeqCst);
            }
        }));

        store.set(Some(session(1)));
        store.set(Some(session(2)));
        store.clear();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(seen_none.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let store = ActiveSessionStore::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_ref = Arc::clone(&calls);
        let id = store.subscribe(Arc::new(move |_| {
            calls_ref.fetch_add(1, Ordering::SeqCst);
        }));

        store.set(Some(session(1)));
        store.unsubscribe(id);
        store.set(Some(session(2)));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriber_may_re_read_the_store() {
        let store = Arc::new(ActiveSessionStore::new());
        let observed = Arc::new(Mutex::new(None));

        let store_ref = Arc::clone(&store);
        let observed_ref = Arc::clone(&observed);
        store.subscribe(Arc::new(move |_| {
            *observed_ref.lock().unwrap() = store_ref.get();
        }));

        store.set(Some(session(7)));
        assert_eq!(*observed.lock().unwrap(), Some(session(7)));
    }

    proptest! {
        /// After any sequence of set/clear calls, get() equals the last
        /// value set, or None if the last call was a clear.
        #[test]
        fn get_always_returns_last_write(ops in prop::collection::vec(any::<Option<u8>>(), 1..20)) {
            let store = ActiveSessionStore::new();
            for op in &ops {
                store.set(op.map(session));
            }
            let expected = ops.last().unwrap().map(session);
            prop_assert_eq!(store.get(), expected);
        }
    }
}
