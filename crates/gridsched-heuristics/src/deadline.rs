//! Deadline-aware greedy placement.
//!
//! Tasks are first sorted by a [`TaskOrder`], then placed one by one on
//! the resource with minimal predicted completion, but only when that
//! completion meets the task's absolute deadline. Infeasible tasks are
//! left unscheduled; no other resource is tried since every other
//! resource completes later.

use std::cmp::Ordering;

use tracing::{debug, warn};

use gridsched_core::{Fleet, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, best_resource, commit, split_committed};

/// Sorting rule applied before placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskOrder {
    /// Earliest absolute deadline first.
    Deadline,
    /// Shortest task first.
    Length,
    /// Earliest absolute deadline first, except that a task whose
    /// deadline is less than `deadline_delta` times later and whose
    /// length is more than `length_delta` times larger goes first.
    /// Equal deadlines put the longer task first.
    Mixed {
        deadline_delta: f64,
        length_delta: f64,
    },
}

impl TaskOrder {
    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match *self {
            TaskOrder::Deadline => a.absolute_deadline().total_cmp(&b.absolute_deadline()),
            TaskOrder::Length => a.length.total_cmp(&b.length),
            TaskOrder::Mixed {
                deadline_delta,
                length_delta,
            } => {
                let (da, db) = (a.absolute_deadline(), b.absolute_deadline());
                let slightly_later = |early: f64, late: f64| late / early < deadline_delta;
                let much_longer = |short: &Task, long: &Task| long.length / short.length > length_delta;

                if da < db {
                    if slightly_later(da, db) && much_longer(a, b) {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                } else if da > db {
                    if slightly_later(db, da) && much_longer(b, a) {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                } else {
                    b.length.total_cmp(&a.length)
                }
            }
        }
    }

    /// Stable sort of `tasks` by this order.
    ///
    /// The mixed order is not transitive, so it goes through an insertion
    /// sort that only relies on pairwise comparisons and cannot panic.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self {
            TaskOrder::Deadline | TaskOrder::Length => tasks.sort_by(|a, b| self.compare(a, b)),
            TaskOrder::Mixed { .. } => {
                for i in 1..tasks.len() {
                    let mut j = i;
                    while j > 0 && self.compare(&tasks[j - 1], &tasks[j]) == Ordering::Greater {
                        tasks.swap(j - 1, j);
                        j -= 1;
                    }
                }
            }
        }
    }
}

/// Sorted greedy placement with deadline admission.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineAware {
    order: TaskOrder,
}

impl DeadlineAware {
    pub fn new(order: TaskOrder) -> Self {
        Self { order }
    }

    /// Earliest-deadline-first variant.
    pub fn deadline() -> Self {
        Self::new(TaskOrder::Deadline)
    }

    /// Shortest-task-first variant.
    pub fn min_deadline() -> Self {
        Self::new(TaskOrder::Length)
    }

    pub fn mix_deadline(deadline_delta: f64, length_delta: f64) -> Self {
        Self::new(TaskOrder::Mixed {
            deadline_delta,
            length_delta,
        })
    }

    pub fn order(&self) -> TaskOrder {
        self.order
    }
}

impl Heuristic for DeadlineAware {
    fn name(&self) -> &'static str {
        match self.order {
            TaskOrder::Deadline => "deadline",
            TaskOrder::Length => "min-deadline",
            TaskOrder::Mixed { .. } => "mix-deadline",
        }
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        let (mut scheduled, mut pending) = split_committed(tasks);
        self.order.sort(&mut pending);

        let mut unscheduled = Vec::new();

        for mut task in pending {
            match best_resource(&task, fleet.resources(), ledger) {
                Some((idx, finish)) if task.meets_deadline(ledger.absolute(finish)) => {
                    let resource = &mut fleet.resources_mut()[idx];
                    commit(&mut task, resource, ledger);
                    debug!(
                        heuristic = self.name(),
                        task = task.id,
                        resource = resource.id,
                        start = task.scheduled_start,
                        finish,
                        "committed task"
                    );
                    scheduled.push(task);
                }
                best => {
                    warn!(
                        heuristic = self.name(),
                        task = task.id,
                        best_completion = best.map(|(_, c)| ledger.absolute(c)),
                        deadline = task.absolute_deadline(),
                        "task cannot meet its deadline"
                    );
                    unscheduled.push(task);
                }
            }
        }

        Outcome {
            scheduled,
            unscheduled,
        }
    }
}
