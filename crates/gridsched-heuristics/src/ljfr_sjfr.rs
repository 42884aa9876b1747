//! LJFR/SJFR: longest-job-fastest-resource warm-up, then alternate
//! shortest and longest.
//!
//! The first `|resources|` commitments use the MaxMin rule so that every
//! resource receives one large task early. After that each commitment
//! alternates between the MinMin and the MaxMin rule, starting with
//! MinMin.

use gridsched_core::{Fleet, Task, WorkloadLedger};

use crate::heuristic::{Heuristic, Outcome, drain};
use crate::min_min::{select_max, select_min};

#[derive(Debug, Clone, Copy, Default)]
pub struct LjfrSjfr;

/// Whether commitment number `round` uses the MinMin rule.
fn uses_min(round: usize, warm_up: usize) -> bool {
    round >= warm_up && (round - warm_up) % 2 == 0
}

impl Heuristic for LjfrSjfr {
    fn name(&self) -> &'static str {
        "ljfr-sjfr"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        _now: f64,
    ) -> Outcome {
        let warm_up = fleet.len();
        drain(self.name(), tasks, fleet, ledger, |pending, resources, ledger, round| {
            if uses_min(round, warm_up) {
                select_min(pending, resources, ledger)
            } else {
                select_max(pending, resources, ledger)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::*;

    #[test]
    fn rule_sequence() {
        let rules: Vec<_> = (0..6).map(|r| uses_min(r, 2)).collect();
        assert_eq!(rules, vec![false, false, true, false, true, false]);
    }

    #[test]
    fn warm_up_places_largest_tasks_first() {
        let mut fleet = fleet(&[1.0, 1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = LjfrSjfr.compute(
            tasks(&[1.0, 50.0, 2.0, 40.0, 3.0]),
            &mut fleet,
            &mut ledger,
            0.0,
        );

        let order: Vec<_> = out.scheduled.iter().map(|t| t.id).collect();
        // Warm-up: 50, 40. Then min (1), max (3), min (2).
        assert_eq!(order, vec![2, 4, 1, 5, 3]);
        assert_eq!(placements(&out.scheduled)[..2], [(2, 1), (4, 2)]);
        assert_eq!(ledger.get(1) + ledger.get(2), 96.0);
    }

    #[test]
    fn single_resource_sums_lengths() {
        let mut fleet = fleet(&[1.0]);
        let mut ledger = WorkloadLedger::new();

        let out = LjfrSjfr.compute(tasks(&[4.0, 8.0, 2.0]), &mut fleet, &mut ledger, 0.0);

        assert_eq!(out.scheduled.len(), 3);
        assert!(out.unscheduled.is_empty());
        assert_eq!(ledger.get(1), 14.0);
    }
}
