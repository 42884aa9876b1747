//! One-call entry point: scenario configuration in, schedule out.

use gridsched_core::config::{PublicConfig, ScenarioConfig};
use gridsched_core::Task;

use crate::batch::{BatchOrchestrator, Settings};
use crate::convert;
use crate::error::OrchestratorResult;
use crate::factory::build_heuristic;
use crate::hybrid::HybridOrchestrator;
use crate::schedule::Schedule;

/// Either kind of orchestrator, chosen by whether the scenario has a
/// public pool.
pub enum Orchestrator {
    Batch(BatchOrchestrator),
    Hybrid(HybridOrchestrator),
}

impl Orchestrator {
    pub fn from_config(config: &ScenarioConfig) -> OrchestratorResult<Self> {
        let settings = convert::settings(&config.scheduler)?;
        let private = BatchOrchestrator::new(
            build_heuristic(&config.scheduler.heuristic),
            convert::fleet(&config.resources, &config.classes)?,
            settings,
        );

        match &config.public {
            None => Ok(Orchestrator::Batch(private)),
            Some(public) => {
                let public = public_side(public, settings)?;
                Ok(Orchestrator::Hybrid(HybridOrchestrator::new(private, public)?))
            }
        }
    }

    pub fn prepare_batch(&mut self, tasks: Vec<Task>) -> Schedule {
        match self {
            Orchestrator::Batch(batch) => batch.prepare_batch(tasks),
            Orchestrator::Hybrid(hybrid) => hybrid.prepare_batch(tasks),
        }
    }

    /// Heuristic names, private first.
    pub fn heuristics(&self) -> Vec<&'static str> {
        match self {
            Orchestrator::Batch(batch) => vec![batch.heuristic_name()],
            Orchestrator::Hybrid(hybrid) => vec![
                hybrid.private().heuristic_name(),
                hybrid.public().heuristic_name(),
            ],
        }
    }
}

fn public_side(config: &PublicConfig, private: Settings) -> OrchestratorResult<BatchOrchestrator> {
    let settings = Settings::new(private.interval())?.with_advance(config.advance);
    Ok(BatchOrchestrator::new(
        build_heuristic(&config.heuristic),
        convert::fleet(&config.resources, &config.classes)?,
        settings,
    ))
}

/// Validate `config`, build the orchestrator it describes and run its
/// task roster through it.
pub fn run_scenario(config: &ScenarioConfig) -> OrchestratorResult<Schedule> {
    let tasks = convert::tasks(&config.tasks)?;
    let mut orchestrator = Orchestrator::from_config(config)?;
    Ok(orchestrator.prepare_batch(tasks))
}
