//! Pass-through heuristic used to switch scheduling off.

use gridsched_core::{Fleet, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome};

/// Reports every task as scheduled without binding it to a resource.
/// The ledger is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl Heuristic for Null {
    fn name(&self) -> &'static str {
        "null"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        _fleet: &mut Fleet,
        _ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        Outcome {
            scheduled: tasks,
            unscheduled: Vec::new(),
        }
    }
}
