//! MinMax: prefer the task whose earliest-completion resource is also
//! closest to its fastest possible execution.
//!
//! For each pending task let `min_ce` be its execution time on the
//! resource with minimal completion and `min_e` its minimal execution
//! time over all resources. The task with the largest `min_e / min_ce`
//! is committed to its minimal-completion resource.

use gridsched_core::{Fleet, Resource, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, Pick, best_resource, drain};

fn ratio(task: &Task, resources: &[Resource], ledger: &WorkloadLedger) -> Option<(usize, f64)> {
    let (idx, _) = best_resource(task, resources, ledger)?;
    let min_ce = resources[idx].exec_time(task);
    let min_e = resources
        .iter()
        .map(|r| r.exec_time(task))
        .fold(f64::INFINITY, f64::min);

    let ratio = if min_ce > 0.0 { min_e / min_ce } else { 1.0 };
    Some((idx, ratio))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl Heuristic for MinMax {
    fn name(&self) -> &'static str {
        "min-max"
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
                let Some((r, ratio)) = ratio(task, resources, ledger) else {
                    continue;
                };
                if best.is_none_or(|(_, max)| ratio > max) {
                    best = Some((Pick { task: t, resource: r }, ratio));
                }
            }
            best.map(|(pick, _)| pick)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::*;

    #[test]
    fn ratio_is_one_on_fastest_resource() {
        let fleet = fleet(&[1.0, 4.0]);
        let ledger = WorkloadLedger::new();
        assert_eq!(ratio(&task(1, 40.0), fleet.resources(), &ledger), Some((1, 1.0)));
    }

    #[test]
    fn ratio_drops_when_fast_resource_is_busy() {
        let fleet = fleet(&[1.0, 4.0]);
        let mut ledger = WorkloadLedger::new();
        ledger.set(2, 100.0);
        // Best completion is the slow resource (40), fastest exec is 10.
        assert_eq!(ratio(&task(1, 40.0), fleet.resources(), &ledger), Some((0, 0.25)));
    }

    #[test]
    fn zero_length_task_has_unit_ratio() {
        let fleet = fleet(&[1.0, 4.0]);
        let ledger = WorkloadLedger::new();
        assert_eq!(ratio(&task(1, 0.0), fleet.resources(), &ledger), Some((0, 1.0)));
    }

    #[test]
    fn commits_tasks_that_keep_their_fastest_resource_first() {
        let mut fleet = fleet(&[1.0, 4.0]);
        let mut ledger = WorkloadLedger::new();
        ledger.set(2, 30.0);

        // t1 (len 8): slow 8 vs fast 32 -> slow, ratio 2/8.
        // t2 (len 400): slow 400 vs fast 130 -> fast, ratio 1.
        let out = MinMax.compute(tasks(&[8.0, 400.0]), &mut fleet, &mut ledger, 0.0);

        assert_eq!(placements(&out.scheduled), vec![(2, 2), (1, 1)]);
        assert_eq!(ledger.get(2), 130.0);
        assert_eq!(ledger.get(1), 8.0);
    }

    #[test]
    fn single_resource_schedules_everything() {
        let mut fleet = fleet(&[1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = MinMax.compute(tasks(&[5.0, 7.0]), &mut fleet, &mut ledger, 0.0);
        assert_eq!(out.scheduled.len(), 2);
        assert_eq!(ledger.get(1), 12.0);
    }
}
