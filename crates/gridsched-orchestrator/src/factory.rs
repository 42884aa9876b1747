//! Heuristic construction from configuration.

use gridsched_core::config::{FallbackConfig, HeuristicConfig, HeuristicKind};
use gridsched_elastic::{ElasticCost, InfeasiblePolicy};
use gridsched_heuristics::{
    DeadlineAware, Heuristic, LjfrSjfr, MaxMin, MinMax, MinMin, Null, Sufferage, WorkQueue,
};

/// Elastic infeasible-task policy for a configured fallback.
pub fn infeasible_policy(fallback: FallbackConfig) -> InfeasiblePolicy {
    match fallback {
        FallbackConfig::LeaveUnscheduled => InfeasiblePolicy::LeaveUnscheduled,
        FallbackConfig::Cheapest => InfeasiblePolicy::CheapestCandidate,
    }
}

/// Build the heuristic named by `config`.
pub fn build_heuristic(config: &HeuristicConfig) -> Box<dyn Heuristic> {
    match config.name {
        HeuristicKind::Null => Box::new(Null),
        HeuristicKind::WorkQueue => Box::new(WorkQueue),
        HeuristicKind::MinMin => Box::new(MinMin),
        HeuristicKind::MaxMin => Box::new(MaxMin),
        HeuristicKind::MinMax => Box::new(MinMax),
        HeuristicKind::Sufferage => Box::new(Sufferage),
        HeuristicKind::LjfrSjfr => Box::new(LjfrSjfr),
        HeuristicKind::Deadline => Box::new(DeadlineAware::deadline()),
        HeuristicKind::MinDeadline => Box::new(DeadlineAware::min_deadline()),
        HeuristicKind::MixDeadline => Box::new(DeadlineAware::mix_deadline(
            config.deadline_delta,
            config.length_delta,
        )),
        HeuristicKind::ElasticCost => Box::new(ElasticCost::new(infeasible_policy(config.fallback))),
    }
}
