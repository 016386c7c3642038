//! Session services
//!
//! The hooks and state machines built on top of the stores: the session
//! data hook, the loader/reconciler, the per-screen timer hooks, and the
//! cross-screen resumption bar.

pub mod float_bar;
pub mod loader;
pub mod session;
pub mod timers;

pub use float_bar::{FloatingBar, FloatingBarView, Screen};
pub use loader::load_workout_session;
pub use session::{
    FinishOutcome, Overlay, SessionMode, SetInput, SetToggle, WorkoutSession,
};
pub use timers::{RestTimer, WorkoutTimer};
