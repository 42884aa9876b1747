//! WorkQueue: tasks in input order, each onto the least-loaded resource.

use gridsched_core::{Fleet, Resource, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, Pick, drain};

/// Index of the resource with the smallest ledger value.
fn least_loaded(resources: &[Resource], ledger: &WorkloadLedger) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, resource) in resources.iter().enumerate() {
        let load = ledger.get(resource.id);
        if best.is_none_or(|(_, min)| load < min) {
            best = Some((idx, load));
        }
    }
    best.map(|(idx, _)| idx)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkQueue;

impl Heuristic for WorkQueue {
    fn name(&self) -> &'static str {
        "work-queue"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        drain(self.name(), tasks, fleet, ledger, |pending, resources, ledger, _| {
            if pending.is_empty() {
                return None;
            }
            least_loaded(resources, ledger).map(|resource| Pick { task: 0, resource })
        })
    }
}
