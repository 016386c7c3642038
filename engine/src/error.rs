//! Engine error handling
//!
//! This module provides the unified error type surfaced by session
//! operations. Every failure here is scoped to the current screen or
//! operation; nothing is fatal to the process.

use thiserror::Error;

/// Error type returned by session and loader operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
