//! MinMin and MaxMin.
//!
//! Both compute, for every pending task, its best (earliest-completing)
//! resource. MinMin then commits the task whose best completion is the
//! smallest; MaxMin the task whose best completion is the largest. The
//! ledger is updated after each commitment, so later rounds see the new
//! workload.

use gridsched_core::{Fleet, Resource, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, Pick, best_resource, drain};

/// Pair with the globally smallest predicted completion.
pub(crate) fn select_min(
    pending: &[Task],
    resources: &[Resource],
    ledger: &WorkloadLedger,
) -> Option<Pick> {
    let mut best: Option<(Pick, f64)> = None;
    for (t, task) in pending.iter().enumerate() {
        let Some((r, c)) = best_resource(task, resources, ledger) else {
            continue;
        };
        if best.is_none_or(|(_, min)| c < min) {
            best = Some((Pick { task: t, resource: r }, c));
        }
    }
    best.map(|(pick, _)| pick)
}

/// Task whose best completion is the largest, on its best resource.
pub(crate) fn select_max(
    pending: &[Task],
    resources: &[Resource],
    ledger: &WorkloadLedger,
) -> Option<Pick> {
    let mut best: Option<(Pick, f64)> = None;
    for (t, task) in pending.iter().enumerate() {
        let Some((r, c)) = best_resource(task, resources, ledger) else {
            continue;
        };
        if best.is_none_or(|(_, max)| c > max) {
            best = Some((Pick { task: t, resource: r }, c));
        }
    }
    best.map(|(pick, _)| pick)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinMin;

impl Heuristic for MinMin {
    fn name(&self) -> &'static str {
        "min-min"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        drain(self.name(), tasks, fleet, ledger, |pending, resources, ledger, _| {
            select_min(pending, resources, ledger)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMin;

impl Heuristic for MaxMin {
    fn name(&self) -> &'static str {
        "max-min"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        drain(self.name(), tasks, fleet, ledger, |pending, resources, ledger, _| {
            select_max(pending, resources, ledger)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::*;

    #[test]
    fn min_min_spreads_equal_resources() {
        let mut fleet = fleet(&[1.0, 1.0, 1.0, 1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = MinMin.compute(tasks(&[10.0, 20.0, 30.0, 40.0]), &mut fleet, &mut ledger, 0.0);

        assert!(out.unscheduled.is_empty());
        assert_eq!(placements(&out.scheduled), vec![(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert!(out.scheduled.iter().all(|t| t.scheduled_start == 0.0));
        assert_eq!(ledger.get(1), 10.0);
        assert_eq!(ledger.get(4), 40.0);
    }

    #[test]
    fn min_min_stacks_on_single_resource() {
        let mut fleet = fleet(&[1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = MinMin.compute(tasks(&[30.0, 10.0, 20.0]), &mut fleet, &mut ledger, 0.0);

        let order: Vec<_> = out.scheduled.iter().map(|t| (t.id, t.scheduled_start)).collect();
        assert_eq!(order, vec![(2, 0.0), (3, 10.0), (1, 30.0)]);
        assert_eq!(ledger.get(1), 60.0);
    }

    #[test]
    fn max_min_commits_longest_first() {
        let mut fleet = fleet(&[1.0, 2.0]);
        let mut ledger = WorkloadLedger::new();

        let out = MaxMin.compute(tasks(&[10.0, 40.0, 20.0]), &mut fleet, &mut ledger, 0.0);

        // 40 -> fast (20); 20 -> slow (20 < 30); 10 -> fast (25 < 30).
        assert_eq!(placements(&out.scheduled), vec![(2, 2), (3, 1), (1, 2)]);
        assert_eq!(ledger.get(1), 20.0);
        assert_eq!(ledger.get(2), 25.0);
    }

    #[test]
    fn ties_go_to_first_task_and_resource() {
        let mut fleet = fleet(&[1.0, 1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = MinMin.compute(tasks(&[5.0, 5.0]), &mut fleet, &mut ledger, 0.0);
        assert_eq!(placements(&out.scheduled), vec![(1, 1), (2, 2)]);

        let mut ledger = WorkloadLedger::new();
        let out = MaxMin.compute(tasks(&[5.0, 5.0]), &mut fleet, &mut ledger, 0.0);
        assert_eq!(placements(&out.scheduled), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn already_committed_tasks_pass_through() {
        let mut fleet = fleet(&[1.0]);
        let mut ledger = WorkloadLedger::new();
        let mut input = tasks(&[10.0, 10.0]);
        input[0].assign(1, 50.0);

        let out = MinMin.compute(input, &mut fleet, &mut ledger, 0.0);

        assert_eq!(out.scheduled.len(), 2);
        assert_eq!(out.scheduled[0].scheduled_start, 50.0);
        assert_eq!(out.scheduled[1].scheduled_start, 0.0);
        assert_eq!(ledger.get(1), 10.0);
    }

    #[test]
    fn empty_fleet_leaves_everything_unscheduled() {
        let mut fleet = Fleet::default();
        let mut ledger = WorkloadLedger::new();

        let out = MaxMin.compute(tasks(&[1.0, 2.0]), &mut fleet, &mut ledger, 0.0);
        assert!(out.scheduled.is_empty());
        assert_eq!(out.unscheduled.len(), 2);
        assert!(ledger.is_empty());
    }
}
