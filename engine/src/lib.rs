//! FitTrack Session Engine
//!
//! The in-memory core of the workout tracker: process-wide stores, the two
//! anchor-based timers, the session state machine, the draft reconciler, and
//! the cross-screen resumption contract.
//!
//! ## Architecture
//!
//! - Stores: singleton anchors and caches shared by every screen
//! - Services: the hooks driving one open workout (session, loader, timers,
//!   floating bar)
//! - Repositories: traits for the backing store, bound by the host
//! - Cues/Navigation: fire-and-forget collaborators for sound, haptics and
//!   routing

pub mod clock;
pub mod config;
pub mod cues;
pub mod error;
pub mod navigation;
pub mod repositories;
pub mod services;
pub mod state;
pub mod stores;
