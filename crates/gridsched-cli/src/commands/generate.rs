//! Random scenario generation.
//!
//! Every quantity is drawn uniformly from an inclusive range with a seeded
//! RNG, so the same arguments always yield the same scenario.

use std::path::Path;

use anyhow::{Result, ensure};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use gridsched_core::config::{
    AdvanceMode, ClassConfig, HeuristicConfig, HeuristicKind, PublicConfig, ReschedulingConfig,
    ResourceConfig, ScenarioConfig, SchedulerConfig, TaskConfig,
};

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Number of tasks
    #[arg(short, long, default_value_t = 100)]
    pub tasks: u32,
    /// Number of private resources
    #[arg(short, long, default_value_t = 4)]
    pub resources: u32,
    /// RNG seed
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,
    /// Heuristic for the private pool
    #[arg(long, default_value = "min-min")]
    pub heuristic: HeuristicKind,
    /// Scheduling interval
    #[arg(long, default_value_t = 100.0)]
    pub interval: f64,
    #[arg(long, default_value_t = 1_000.0)]
    pub length_min: f64,
    #[arg(long, default_value_t = 20_000.0)]
    pub length_max: f64,
    /// Latest arrival time
    #[arg(long, default_value_t = 1_000.0)]
    pub arrival_max: f64,
    /// Relative deadline range; tasks get no deadline when unset
    #[arg(long)]
    pub deadline_min: Option<f64>,
    #[arg(long)]
    pub deadline_max: Option<f64>,
    #[arg(long, default_value_t = 10.0)]
    pub speed_min: f64,
    #[arg(long, default_value_t = 100.0)]
    pub speed_max: f64,
    /// Add an elastic public pool with a small and a large class
    #[arg(long)]
    pub hybrid: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            tasks: 100,
            resources: 4,
            seed: 0,
            output: None,
            heuristic: HeuristicKind::MinMin,
            interval: 100.0,
            length_min: 1_000.0,
            length_max: 20_000.0,
            arrival_max: 1_000.0,
            deadline_min: None,
            deadline_max: None,
            speed_min: 10.0,
            speed_max: 100.0,
            hybrid: false,
        }
    }
}

pub fn generate(args: &GenerateArgs) -> Result<()> {
    let scenario = scenario(args)?;
    let text = scenario.to_toml_string()?;

    match &args.output {
        Some(path) => {
            std::fs::write(Path::new(path), text)?;
            println!("✓ Generated {path}");
        }
        None => print!("{text}"),
    }

    Ok(())
}

/// Build a random scenario from `args`.
pub fn scenario(args: &GenerateArgs) -> Result<ScenarioConfig> {
    ensure!(args.interval > 0.0, "interval must be positive, got {}", args.interval);
    ensure!(
        0.0 <= args.length_min && args.length_min <= args.length_max,
        "invalid length range {}..={}",
        args.length_min,
        args.length_max
    );
    ensure!(args.arrival_max >= 0.0, "arrival_max must be non-negative");
    ensure!(
        0.0 < args.speed_min && args.speed_min <= args.speed_max,
        "invalid speed range {}..={}",
        args.speed_min,
        args.speed_max
    );
    let deadlines = match (args.deadline_min, args.deadline_max) {
        (None, None) => None,
        (Some(min), Some(max)) => {
            ensure!(0.0 <= min && min <= max, "invalid deadline range {min}..={max}");
            Some((min, max))
        }
        _ => anyhow::bail!("deadline_min and deadline_max must be given together"),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);

    let resources = (1..=u64::from(args.resources))
        .map(|id| ResourceConfig {
            id,
            speed: draw(&mut rng, args.speed_min, args.speed_max),
        })
        .collect();

    let tasks = (1..=u64::from(args.tasks))
        .map(|id| TaskConfig {
            id,
            length: draw(&mut rng, args.length_min, args.length_max),
            arrival: draw(&mut rng, 0.0, args.arrival_max),
            deadline: deadlines.map(|(min, max)| draw(&mut rng, min, max)),
            units: None,
        })
        .collect();

    let public = args.hybrid.then(|| public_pool(args));

    info!(
        tasks = args.tasks,
        resources = args.resources,
        seed = args.seed,
        hybrid = args.hybrid,
        "generated scenario"
    );

    Ok(ScenarioConfig {
        scheduler: SchedulerConfig {
            interval: args.interval,
            advance: AdvanceMode::Clamp,
            heuristic: HeuristicConfig::named(args.heuristic),
            rescheduling: ReschedulingConfig::Disabled,
        },
        resources,
        classes: Vec::new(),
        public,
        tasks,
    })
}

/// Uniform draw rounded to a whole number, kept inside `min..=max`.
fn draw(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    rng.gen_range(min..=max).round().clamp(min, max)
}

/// Two on-demand classes sized against the private speed range and
/// billed per scheduling interval.
fn public_pool(args: &GenerateArgs) -> PublicConfig {
    PublicConfig {
        advance: AdvanceMode::Clamp,
        heuristic: HeuristicConfig::named(HeuristicKind::ElasticCost),
        resources: Vec::new(),
        classes: vec![
            ClassConfig {
                name: "small".to_string(),
                speed: args.speed_max,
                price: 1.0,
                price_interval: args.interval,
                count: None,
            },
            ClassConfig {
                name: "large".to_string(),
                speed: args.speed_max * 4.0,
                price: 3.5,
                price_interval: args.interval,
                count: Some(args.resources.max(1)),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_scenario() {
        let args = GenerateArgs {
            tasks: 20,
            seed: 7,
            ..GenerateArgs::default()
        };
        assert_eq!(scenario(&args).unwrap(), scenario(&args).unwrap());

        let other = GenerateArgs { seed: 8, ..args.clone() };
        assert_ne!(scenario(&args).unwrap(), scenario(&other).unwrap());
    }

    #[test]
    fn test_values_stay_in_range() {
        let args = GenerateArgs {
            tasks: 50,
            resources: 6,
            deadline_min: Some(200.0),
            deadline_max: Some(400.0),
            ..GenerateArgs::default()
        };
        let config = scenario(&args).unwrap();

        assert_eq!(config.tasks.len(), 50);
        assert_eq!(config.resources.len(), 6);
        for task in &config.tasks {
            assert!((1_000.0..=20_000.0).contains(&task.length));
            assert!((0.0..=1_000.0).contains(&task.arrival));
            let deadline = task.deadline.unwrap();
            assert!((200.0..=400.0).contains(&deadline));
        }
        for resource in &config.resources {
            assert!((10.0..=100.0).contains(&resource.speed));
        }
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let inverted = GenerateArgs {
            length_min: 10.0,
            length_max: 5.0,
            ..GenerateArgs::default()
        };
        assert!(scenario(&inverted).is_err());

        let half_deadline = GenerateArgs {
            deadline_min: Some(10.0),
            ..GenerateArgs::default()
        };
        assert!(scenario(&half_deadline).is_err());

        let zero_speed = GenerateArgs {
            speed_min: 0.0,
            ..GenerateArgs::default()
        };
        assert!(scenario(&zero_speed).is_err());
    }

    #[test]
    fn test_generated_file_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.toml");
        let args = GenerateArgs {
            tasks: 30,
            hybrid: true,
            deadline_min: Some(300.0),
            deadline_max: Some(900.0),
            output: Some(path.to_str().unwrap().to_string()),
            ..GenerateArgs::default()
        };

        generate(&args).unwrap();

        let config = ScenarioConfig::from_file(&path).unwrap();
        assert!(config.is_hybrid());
        let schedule = gridsched_orchestrator::run_scenario(&config).unwrap();
        assert_eq!(schedule.scheduled.len() + schedule.unscheduled.len(), 30);
    }
}
