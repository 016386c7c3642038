//! Cross-screen workout resumption bar
//!
//! A passive, render-only consumer of the Active-Session and Rest-Timer
//! stores. It appears on every screen except the live workout view and the
//! add-exercise picker, re-derives elapsed/remaining from the anchors on
//! every tick, and carries its own edge-triggered completion cue: it may be
//! the only mounted observer at the moment the countdown crosses zero.

use crate::clock::{elapsed_secs, remaining_secs};
use crate::cues::{fire_rest_cues, CuePlayer};
use crate::navigation::{NavIntent, Navigator};
use crate::state::EngineState;
use crate::stores::SubscriptionId;
use fittrack_shared::{ActiveSession, EditSessionId};
use std::sync::{Arc, Mutex, Weak};

/// Screen identity reported by the host router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    History,
    Exercises,
    Settings,
    Workout,
    AddExercise,
}

impl Screen {
    /// The live view (or its picker) is already showing the session; a bar
    /// on top of it would be redundant
    fn suppresses_bar(self) -> bool {
        matches!(self, Screen::Workout | Screen::AddExercise)
    }
}

/// Snapshot rendered by the bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingBarView {
    pub workout_id: EditSessionId,
    pub elapsed_secs: i64,
    pub sets_count: usize,
    /// Present while a rest countdown is running
    pub rest_remaining_secs: Option<i64>,
}

pub struct FloatingBar {
    state: EngineState,
    cues: Arc<dyn CuePlayer>,
    navigator: Arc<dyn Navigator>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    screen: Option<Screen>,
    session: Option<ActiveSession>,
    last_rest_remaining: i64,
    session_sub: Option<SubscriptionId>,
    rest_sub: Option<SubscriptionId>,
}

impl FloatingBar {
    pub fn new(
        state: EngineState,
        cues: Arc<dyn CuePlayer>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state,
            cues,
            navigator,
            inner: Mutex::new(Inner::default()),
        })
    }

    /// Subscribe to the stores and seed the cached state from their current
    /// contents
    pub fn mount(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let session_sub = self.state.active_session.subscribe(Arc::new(move |session| {
            if let Some(bar) = weak.upgrade() {
                bar.inner.lock().unwrap().session = session.cloned();
            }
        }));

        let weak: Weak<Self> = Arc::downgrade(self);
        let clock = self.state.clock.clone();
        let rest_sub = self.state.rest_timer.subscribe(Arc::new(move |anchor| {
            if let Some(bar) = weak.upgrade() {
                let mut inner = bar.inner.lock().unwrap();
                inner.last_rest_remaining = match anchor {
                    // A fresh arm seeds the tracker so even a sub-tick
                    // countdown still produces its edge
                    Some(anchor) => remaining_secs(anchor.end_time, clock.now()),
                    // A cleared store is a dismissal or a finished session,
                    // not an expiry
                    None => 0,
                };
            }
        }));

        let mut inner = self.inner.lock().unwrap();
        inner.session = self.state.active_session.get();
        inner.last_rest_remaining = self.state.rest_timer.state().time_remaining_secs;
        inner.session_sub = Some(session_sub);
        inner.rest_sub = Some(rest_sub);
    }

    pub fn unmount(&self) {
        let (session_sub, rest_sub) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.session_sub.take(), inner.rest_sub.take())
        };
        if let Some(id) = session_sub {
            self.state.active_session.unsubscribe(id);
        }
        if let Some(id) = rest_sub {
            self.state.rest_timer.unsubscribe(id);
        }
    }

    pub fn set_screen(&self, screen: Screen) {
        self.inner.lock().unwrap().screen = Some(screen);
    }

    /// What the bar shows right now, or `None` while hidden
    pub fn view(&self) -> Option<FloatingBarView> {
        let session = {
            let inner = self.inner.lock().unwrap();
            if inner.screen.map(Screen::suppresses_bar).unwrap_or(false) {
                return None;
            }
            inner.session.clone()?
        };

        let rest = self.state.rest_timer.state();
        Some(FloatingBarView {
            workout_id: session.id,
            elapsed_secs: elapsed_secs(session.start_time, self.state.clock.now()),
            sets_count: session.sets_count,
            rest_remaining_secs: rest.is_active.then_some(rest.time_remaining_secs),
        })
    }

    /// One-second pulse: run the edge-triggered completion cue, then return
    /// the refreshed view
    pub fn tick(&self) -> Option<FloatingBarView> {
        let rest = self.state.rest_timer.state();
        let expired_anchor = self.state.rest_timer.anchor().is_some() && !rest.is_active;

        let fire = {
            let mut inner = self.inner.lock().unwrap();
            if rest.is_active {
                inner.last_rest_remaining = rest.time_remaining_secs;
                false
            } else {
                let crossed = inner.last_rest_remaining > 0 && expired_anchor;
                inner.last_rest_remaining = 0;
                crossed
            }
        };
        if fire {
            fire_rest_cues(
                &self.state.settings.get(),
                self.cues.as_ref(),
                &self.state.config.cues.vibration_pattern,
            );
        }

        self.view()
    }

    /// Tap on the bar: ask the host to reopen the workout screen
    pub fn resume(&self) {
        let session = self.inner.lock().unwrap().session.clone();
        if let Some(session) = session {
            self.navigator.navigate(NavIntent::Workout { id: session.id });
        }
    }
}
