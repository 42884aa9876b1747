use std::path::Path;

use anyhow::Context;
use tracing::info;

use gridsched_core::ScenarioConfig;
use gridsched_orchestrator::{Orchestrator, convert};

use crate::report::{self, Report};

pub fn run(path: &str, format: &str) -> anyhow::Result<()> {
    let config = ScenarioConfig::from_file(Path::new(path))
        .with_context(|| format!("failed to load scenario {path}"))?;
    println!("{}", render(path, &config, format)?);
    Ok(())
}

/// Schedule `config` and format the outcome.
pub fn render(name: &str, config: &ScenarioConfig, format: &str) -> anyhow::Result<String> {
    let tasks = convert::tasks(&config.tasks)?;
    let mut orchestrator = Orchestrator::from_config(config)?;
    info!(
        scenario = name,
        tasks = tasks.len(),
        hybrid = config.is_hybrid(),
        "running scenario"
    );

    let schedule = orchestrator.prepare_batch(tasks);
    let report = Report {
        scenario: name.to_string(),
        heuristics: orchestrator.heuristics(),
        interval: config.scheduler.interval,
        schedule,
    };

    match format {
        "json" => Ok(serde_json::to_string_pretty(&report)?),
        _ => Ok(report::format_report(&report)),
    }
}
