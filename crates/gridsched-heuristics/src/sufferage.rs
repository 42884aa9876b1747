//! Sufferage: commit first the task that would lose most if denied its
//! best resource.
//!
//! The sufferage of a task is `second_min - first_min` over predicted
//! completions. With a single resource it is zero for every task, so
//! tasks are committed in input order.

use gridsched_core::{Fleet, Resource, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, Pick, completion, drain};

/// Best resource index and the sufferage value of `task`.
fn sufferage(task: &Task, resources: &[Resource], ledger: &WorkloadLedger) -> Option<(usize, f64)> {
    let mut first: Option<(usize, f64)> = None;
    let mut second = f64::INFINITY;

    for (idx, resource) in resources.iter().enumerate() {
        let c = completion(task, resource, ledger);
        match first {
            Some((_, min)) if c >= min => second = second.min(c),
            Some((_, min)) => {
                second = min;
                first = Some((idx, c));
            }
            None => first = Some((idx, c)),
        }
    }

    first.map(|(idx, min)| {
        let penalty = if second.is_finite() { second - min } else { 0.0 };
        (idx, penalty)
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sufferage;

impl Heuristic for Sufferage {
    fn name(&self) -> &'static str {
        "sufferage"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        drain(self.name(), tasks, fleet, ledger, |pending, resources, ledger, _| {
            let mut best: Option<(Pick, f64)> = None;
            for (t, task) in pending.iter().enumerate() {
                let Some((r, penalty)) = sufferage(task, resources, ledger) else {
                    continue;
                };
                if best.is_none_or(|(_, max)| penalty > max) {
                    best = Some((Pick { task: t, resource: r }, penalty));
                }
            }
            best.map(|(pick, _)| pick)
        })
    }
}
