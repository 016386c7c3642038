//! Rest countdown anchor
//!
//! Only the end instant is stored. Remaining time is derived by subtraction
//! at every read, which keeps the value correct across suspend/resume and
//! across consumers mounting and unmounting, with zero reconciliation logic.
//! Subscribers receive the raw anchor, never a derived remaining.

use super::{Listener, Listeners, SubscriptionId};
use crate::clock::{remaining_secs, Clock};
use chrono::Duration;
use fittrack_shared::{RestTimerAnchor, RestTimerState};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct RestTimerStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    anchor: Option<RestTimerAnchor>,
    listeners: Listeners<RestTimerAnchor>,
}

impl RestTimerStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Arm the countdown to end `seconds` from now and notify subscribers
    pub fn start(&self, seconds: u32) {
        let end_time = self.clock.now() + Duration::seconds(seconds as i64);
        debug!(seconds, "rest timer armed");
        self.replace(Some(RestTimerAnchor { end_time }));
    }

    /// Drop the anchor and notify subscribers with `None`
    pub fn clear(&self) {
        self.replace(None);
    }

    /// The raw anchor, if any (present even after the countdown has expired)
    pub fn anchor(&self) -> Option<RestTimerAnchor> {
        self.inner.lock().unwrap().anchor
    }

    /// Remaining time derived at call time, clamped at zero
    pub fn state(&self) -> RestTimerState {
        match self.anchor() {
            Some(anchor) => {
                let remaining = remaining_secs(anchor.end_time, self.clock.now());
                RestTimerState {
                    time_remaining_secs: remaining,
                    is_active: remaining > 0,
                }
            }
            None => RestTimerState {
                time_remaining_secs: 0,
                is_active: false,
            },
        }
    }

    pub fn subscribe(&self, listener: Listener<RestTimerAnchor>) -> SubscriptionId {
        self.inner.lock().unwrap().listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unwrap().listeners.remove(id);
    }

    fn replace(&self, anchor: Option<RestTimerAnchor>) {
        let (value, listeners) = {
            let mut inner = self.inner.lock().unwrap();
            inner.anchor = anchor;
            (inner.anchor, inner.listeners.snapshot())
        };
        for listener in listeners {
            listener(value.as_ref());
        }
    }
}
