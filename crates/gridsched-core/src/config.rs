//! Scenario TOML configuration.
//!
//! A scenario names the heuristic(s), the scheduling interval, the
//! private resource roster, an optional public (elastic) pool and the
//! task roster. Values are validated when converted into runtime types.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<PublicConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    /// Length of one scheduling window.
    pub interval: f64,
    #[serde(default)]
    pub advance: AdvanceMode,
    pub heuristic: HeuristicConfig,
    #[serde(default)]
    pub rescheduling: ReschedulingConfig,
}

/// How the workload ledger is advanced before each window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AdvanceMode {
    /// Absolute time axis: `max(value, window_end)`.
    #[default]
    Clamp,
    /// Relative time axis: `max(0, value - elapsed)`.
    ShiftBack,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ReschedulingConfig {
    #[default]
    Disabled,
    Delay,
    DelayPlusEstimate { estimate: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    Null,
    WorkQueue,
    MinMin,
    MaxMin,
    MinMax,
    Sufferage,
    LjfrSjfr,
    Deadline,
    MinDeadline,
    MixDeadline,
    ElasticCost,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 11] = [
        HeuristicKind::Null,
        HeuristicKind::WorkQueue,
        HeuristicKind::MinMin,
        HeuristicKind::MaxMin,
        HeuristicKind::MinMax,
        HeuristicKind::Sufferage,
        HeuristicKind::LjfrSjfr,
        HeuristicKind::Deadline,
        HeuristicKind::MinDeadline,
        HeuristicKind::MixDeadline,
        HeuristicKind::ElasticCost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeuristicKind::Null => "null",
            HeuristicKind::WorkQueue => "work-queue",
            HeuristicKind::MinMin => "min-min",
            HeuristicKind::MaxMin => "max-min",
            HeuristicKind::MinMax => "min-max",
            HeuristicKind::Sufferage => "sufferage",
            HeuristicKind::LjfrSjfr => "ljfr-sjfr",
            HeuristicKind::Deadline => "deadline",
            HeuristicKind::MinDeadline => "min-deadline",
            HeuristicKind::MixDeadline => "mix-deadline",
            HeuristicKind::ElasticCost => "elastic-cost",
        }
    }
}

impl std::fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeuristicKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown heuristic: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeuristicConfig {
    pub name: HeuristicKind,
    /// MixDeadline: deadlines closer than this ratio count as "slightly later".
    #[serde(default = "default_deadline_delta")]
    pub deadline_delta: f64,
    /// MixDeadline: lengths further apart than this ratio count as "much larger".
    #[serde(default = "default_length_delta")]
    pub length_delta: f64,
    /// Elastic cost: what to do with tasks no candidate can finish in time.
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl HeuristicConfig {
    pub fn named(name: HeuristicKind) -> Self {
        Self {
            name,
            deadline_delta: default_deadline_delta(),
            length_delta: default_length_delta(),
            fallback: FallbackConfig::default(),
        }
    }
}

fn default_deadline_delta() -> f64 {
    1.1
}

fn default_length_delta() -> f64 {
    1.7
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackConfig {
    #[default]
    LeaveUnscheduled,
    Cheapest,
}

/// The public (elastic) side of a hybrid run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicConfig {
    #[serde(default)]
    pub advance: AdvanceMode,
    pub heuristic: HeuristicConfig,
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceConfig {
    pub id: u64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassConfig {
    pub name: String,
    pub speed: f64,
    pub price: f64,
    pub price_interval: f64,
    /// Instances that may be created; absent means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskConfig {
    pub id: u64,
    pub length: f64,
    #[serde(default)]
    pub arrival: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
}

impl ScenarioConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn is_hybrid(&self) -> bool {
        self.public.is_some()
    }
}
