//! Error types for the core data model.

use thiserror::Error;

use crate::types::{ResourceId, TaskId};

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Caller contract violations and capacity errors.
///
/// Scheduling infeasibility is not represented here: a task that cannot
/// be placed ends up in an unscheduled set, never in an error.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("task {task}: length must be finite and non-negative, got {length}")]
    InvalidLength { task: TaskId, length: f64 },

    #[error("task {task}: arrival time must be finite and non-negative, got {arrival}")]
    InvalidArrival { task: TaskId, arrival: f64 },

    #[error("task {task}: deadline must be non-negative, got {deadline}")]
    InvalidDeadline { task: TaskId, deadline: f64 },

    #[error("resource {resource}: speed must be positive, got {speed}")]
    InvalidSpeed { resource: ResourceId, speed: f64 },

    #[error("resource class {class}: {reason}")]
    InvalidPricing { class: String, reason: String },

    #[error("duplicate resource id: {0}")]
    DuplicateResource(ResourceId),

    #[error("unknown resource class: {0}")]
    UnknownClass(String),

    #[error("resource class exhausted: {0}")]
    CapacityExhausted(String),

    #[error("no resource id left to provision")]
    ResourceIdsExhausted,
}
