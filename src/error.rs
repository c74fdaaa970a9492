//! Crate error type

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors surfaced to callers of the environment and the evaluator.
///
/// Stepping and observing never fail; everything here is either a structural
/// configuration problem caught at construction or an explicit range check.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("observation out of [0, 1]: dx={dx}, dy={dy}")]
    ObservationOutOfRange { dx: f32, dy: f32 },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
