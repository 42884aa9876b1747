//! The heuristic contract and the ledger helpers every heuristic shares.
//!
//! Predictions follow one model:
//!
//! ```text
//! exec(task, r)       = task.length / r.speed
//! completion(task, r) = ledger[r] + exec(task, r)
//! ```
//!
//! Committing a task stamps `scheduled_start = ledger[r]`, moves
//! `ledger[r]` to the predicted completion and adds `exec` to the
//! resource's uptime.

use tracing::debug;

use gridsched_core::{Fleet, Resource, Task, WorkloadLedger};

/// Result of one heuristic invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Tasks committed by this call, plus tasks that arrived already
    /// committed (returned untouched).
    pub scheduled: Vec<Task>,
    /// Tasks that could not be placed.
    pub unscheduled: Vec<Task>,
}

/// A batch scheduling strategy.
pub trait Heuristic {
    /// Stable kebab-case name, used in logs and reports.
    fn name(&self) -> &'static str;

    /// Assign `tasks` to resources of `fleet`, updating `ledger`.
    ///
    /// `now` is the reference time of the batch on the ledger's time axis;
    /// deadlines are checked against [`WorkloadLedger::absolute`] times.
    /// Committing charges the chosen resource's uptime. Only the elastic
    /// algorithm provisions new resources into `fleet`.
    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        now: f64,
    ) -> Outcome;
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        now: f64,
    ) -> Outcome {
        (**self).compute(tasks, fleet, ledger, now)
    }
}

/// Predicted completion of `task` on `resource` given current workload.
pub fn completion(task: &Task, resource: &Resource, ledger: &WorkloadLedger) -> f64 {
    ledger.get(resource.id) + resource.exec_time(task)
}

/// Commit `task` to `resource`, charging both the ledger and the
/// resource's uptime. Returns the predicted completion time.
pub fn commit(task: &mut Task, resource: &mut Resource, ledger: &mut WorkloadLedger) -> f64 {
    let start = ledger.get(resource.id);
    let exec = resource.exec_time(task);
    task.assign(resource.id, start);
    resource.charge(exec);
    ledger.set(resource.id, start + exec);
    start + exec
}

/// Split off tasks that are already committed to a resource.
pub(crate) fn split_committed(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    tasks.into_iter().partition(Task::is_assigned)
}

/// Resource with the smallest predicted completion for `task`; ties go
/// to the first resource in fleet order.
pub(crate) fn best_resource(
    task: &Task,
    resources: &[Resource],
    ledger: &WorkloadLedger,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, resource) in resources.iter().enumerate() {
        let c = completion(task, resource, ledger);
        if best.is_none_or(|(_, min)| c < min) {
            best = Some((idx, c));
        }
    }
    best
}

/// A (task, resource) pair chosen by a selection rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pick {
    pub task: usize,
    pub resource: usize,
}

/// Repeatedly ask `select` for the next pair until it yields nothing.
///
/// `select` receives the still-pending tasks, the fleet's resources, the
/// ledger and the number of commitments made so far in this call.
pub(crate) fn drain<F>(
    name: &'static str,
    tasks: Vec<Task>,
    fleet: &mut Fleet,
    ledger: &mut WorkloadLedger,
    mut select: F,
) -> Outcome
where
    F: FnMut(&[Task], &[Resource], &WorkloadLedger, usize) -> Option<Pick>,
{
    let (mut scheduled, mut pending) = split_committed(tasks);
    let mut round = 0;

    while let Some(pick) = select(&pending, fleet.resources(), ledger, round) {
        let mut task = pending.remove(pick.task);
        let resource = &mut fleet.resources_mut()[pick.resource];
        let finish = commit(&mut task, resource, ledger);
        debug!(
            heuristic = name,
            task = task.id,
            resource = resource.id,
            start = task.scheduled_start,
            finish,
            "committed task"
        );
        scheduled.push(task);
        round += 1;
    }

    Outcome {
        scheduled,
        unscheduled: pending,
    }
}
