//! Conversions from scenario configuration to validated runtime values.
//!
//! Bridges `gridsched_core::config` records to the [`Task`], [`Fleet`]
//! and [`Settings`] types the orchestrators run on. All contract checks
//! happen here, before any scheduling starts.

use std::collections::HashSet;

use gridsched_core::config::{ClassConfig, ResourceConfig, SchedulerConfig, TaskConfig};
use gridsched_core::{Capacity, Fleet, Resource, ResourceClass, Task};

use crate::batch::Settings;
use crate::error::{OrchestratorError, OrchestratorResult};

pub fn task(config: &TaskConfig) -> OrchestratorResult<Task> {
    let mut task = Task::new(config.id, config.length, config.arrival)?;
    if let Some(deadline) = config.deadline {
        task = task.with_deadline(deadline)?;
    }
    if let Some(units) = config.units {
        task = task.with_units(units);
    }
    Ok(task)
}

/// Convert the task roster, rejecting duplicate ids.
pub fn tasks(configs: &[TaskConfig]) -> OrchestratorResult<Vec<Task>> {
    let mut seen = HashSet::new();
    configs
        .iter()
        .map(|c| {
            if !seen.insert(c.id) {
                return Err(OrchestratorError::Config(format!("duplicate task id {}", c.id)));
            }
            task(c)
        })
        .collect()
}

pub fn resource(config: &ResourceConfig) -> OrchestratorResult<Resource> {
    Ok(Resource::new(config.id, config.speed)?)
}

pub fn class(config: &ClassConfig) -> OrchestratorResult<ResourceClass> {
    let capacity = match config.count {
        Some(n) => Capacity::Limited(n),
        None => Capacity::Unlimited,
    };
    Ok(ResourceClass::new(
        config.name.clone(),
        config.speed,
        config.price,
        config.price_interval,
        capacity,
    )?)
}

/// Build a fleet from a resource roster and a class catalog.
pub fn fleet(resources: &[ResourceConfig], classes: &[ClassConfig]) -> OrchestratorResult<Fleet> {
    let mut names = HashSet::new();
    for c in classes {
        if !names.insert(c.name.as_str()) {
            return Err(OrchestratorError::Config(format!("duplicate class name {}", c.name)));
        }
    }

    let resources = resources.iter().map(resource).collect::<OrchestratorResult<Vec<_>>>()?;
    let classes = classes.iter().map(class).collect::<OrchestratorResult<Vec<_>>>()?;
    Ok(Fleet::new(resources, classes)?)
}

pub fn settings(config: &SchedulerConfig) -> OrchestratorResult<Settings> {
    Settings::new(config.interval)?
        .with_advance(config.advance)
        .with_rescheduling(config.rescheduling.into())
}
