//! Orchestrator error types.

use thiserror::Error;

use gridsched_core::CoreError;

/// Errors raised while building or running an orchestrator.
///
/// Scheduling infeasibility is never an error; it shows up as
/// unscheduled tasks in the resulting schedule.
#[derive(Debug, Error, PartialEq)]
pub enum OrchestratorError {
    #[error("scheduling interval must be positive, got {0}")]
    InvalidInterval(f64),

    #[error("rescheduling estimate must be non-negative, got {0}")]
    InvalidEstimate(f64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
