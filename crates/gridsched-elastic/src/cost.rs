//! Elastic cost algorithm.

use tracing::{debug, warn};

use gridsched_core::{Fleet, Task, WorkloadLedger};
use gridsched_heuristics::{Heuristic, Outcome};

/// What to do with a task that no candidate can finish before its
/// deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfeasiblePolicy {
    /// Return the task in the unscheduled set.
    #[default]
    LeaveUnscheduled,
    /// Commit to the cheapest candidate, ignoring the deadline.
    CheapestCandidate,
}

/// Where a candidate placement would run.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Source {
    /// Index into `fleet.resources()`.
    Existing(usize),
    /// Index into `fleet.classes()`.
    Class(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    source: Source,
    start: f64,
    exec: f64,
    cost: f64,
    feasible: bool,
}

/// Price every existing resource and every available class for `task`.
/// Existing resources come first, each group in fleet order.
fn candidates(task: &Task, fleet: &Fleet, ledger: &WorkloadLedger, now: f64) -> Vec<Candidate> {
    let existing = fleet.resources().iter().enumerate().map(|(idx, r)| {
        let exec = r.exec_time(task);
        let start = ledger.get(r.id).max(now);
        Candidate {
            source: Source::Existing(idx),
            start,
            exec,
            cost: r.marginal_cost(exec),
            feasible: task.meets_deadline(ledger.absolute(start + exec)),
        }
    });

    let classes = fleet
        .classes()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_available())
        .map(|(idx, c)| {
            let exec = c.exec_time(task);
            Candidate {
                source: Source::Class(idx),
                start: now,
                exec,
                cost: c.launch_cost(task),
                feasible: task.meets_deadline(ledger.absolute(now + exec)),
            }
        });

    existing.chain(classes).collect()
}

/// Cheapest candidate accepted by `admit`; the first one wins ties, so an
/// existing resource beats a new instance of the same price.
fn cheapest(candidates: &[Candidate], admit: impl Fn(&Candidate) -> bool) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for c in candidates.iter().filter(|c| admit(c)) {
        if best.is_none_or(|b| c.cost < b.cost) {
            best = Some(*c);
        }
    }
    best
}

/// Deadline-aware, cost-minimising placement that may grow the fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElasticCost {
    policy: InfeasiblePolicy,
}

impl ElasticCost {
    pub fn new(policy: InfeasiblePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InfeasiblePolicy {
        self.policy
    }

    fn choose(
        &self,
        task: &Task,
        fleet: &Fleet,
        ledger: &WorkloadLedger,
        now: f64,
    ) -> Option<Candidate> {
        let all = candidates(task, fleet, ledger, now);
        let chosen = cheapest(&all, |c| c.feasible);
        match (chosen, self.policy) {
            (Some(c), _) => Some(c),
            (None, InfeasiblePolicy::LeaveUnscheduled) => None,
            (None, InfeasiblePolicy::CheapestCandidate) => {
                let fallback = cheapest(&all, |_| true);
                if let Some(c) = &fallback {
                    warn!(
                        task = task.id,
                        cost = c.cost,
                        "no candidate meets deadline, using cheapest"
                    );
                }
                fallback
            }
        }
    }
}

impl Heuristic for ElasticCost {
    fn name(&self) -> &'static str {
        "elastic-cost"
    }

    fn compute(
        &mut self,
        tasks: Vec<Task>,
        fleet: &mut Fleet,
        ledger: &mut WorkloadLedger,
        now: f64,
    ) -> Outcome {
        let mut outcome = Outcome::default();

        for mut task in tasks {
            if task.is_assigned() {
                outcome.scheduled.push(task);
                continue;
            }

            let Some(candidate) = self.choose(&task, fleet, ledger, now) else {
                debug!(
                    task = task.id,
                    deadline = task.absolute_deadline(),
                    "no affordable candidate meets deadline"
                );
                outcome.unscheduled.push(task);
                continue;
            };

            let resource_id = match candidate.source {
                Source::Existing(idx) => fleet.resources()[idx].id,
                Source::Class(idx) => {
                    let class = fleet.classes()[idx].name.clone();
                    match fleet.provision(&class) {
                        Ok(id) => id,
                        Err(e) => {
                            warn!(
                                task = task.id,
                                class = %class,
                                error = %e,
                                "provisioning failed"
                            );
                            outcome.unscheduled.push(task);
                            continue;
                        }
                    }
                }
            };

            let Some(resource) = fleet.resource_mut(resource_id) else {
                outcome.unscheduled.push(task);
                continue;
            };
            resource.charge(candidate.exec);

            let finish = candidate.start + candidate.exec;
            task.assign(resource_id, candidate.start);
            ledger.set(resource_id, finish);

            debug!(
                heuristic = "elastic-cost",
                task = task.id,
                resource = resource_id,
                start = candidate.start,
                finish,
                cost = candidate.cost,
                "committed task"
            );
            outcome.scheduled.push(task);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsched_core::{Capacity, Resource, ResourceClass};

    fn class(name: &str, speed: f64, price: f64, every: f64, capacity: Capacity) -> ResourceClass {
        ResourceClass::new(name, speed, price, every, capacity).unwrap()
    }

    fn pool(class: ResourceClass) -> Fleet {
        Fleet::new(Vec::new(), vec![class]).unwrap()
    }

    fn timed(id: u64, length: f64, deadline: f64) -> Task {
        Task::new(id, length, 0.0).unwrap().with_deadline(deadline).unwrap()
    }

    #[test]
    fn provisions_from_class_and_bills_one_interval() {
        let mut fleet = pool(class("small", 1.0, 1.0, 100.0, Capacity::Limited(3)));
        let mut ledger = WorkloadLedger::new();

        let out = ElasticCost::default().compute(
            vec![Task::new(1, 50.0, 0.0).unwrap()],
            &mut fleet,
            &mut ledger,
            0.0,
        );

        assert_eq!(out.scheduled.len(), 1);
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.total_cost(), 1.0);
        assert_eq!(fleet.class("small").unwrap().capacity, Capacity::Limited(2));
        let vm = &fleet.resources()[0];
        assert_eq!(out.scheduled[0].resource, Some(vm.id));
        assert_eq!(vm.uptime, 50.0);
        assert_eq!(ledger.get(vm.id), 50.0);
    }

    #[test]
    fn reuses_paid_interval_before_buying_new_instance() {
        let mut fleet = pool(class("small", 1.0, 1.0, 100.0, Capacity::Unlimited));
        let mut ledger = WorkloadLedger::new();

        let out = ElasticCost::default().compute(
            vec![Task::new(1, 30.0, 0.0).unwrap(), Task::new(2, 30.0, 0.0).unwrap()],
            &mut fleet,
            &mut ledger,
            0.0,
        );

        // Second task fits in the first instance's paid interval (cost 0).
        assert_eq!(fleet.len(), 1);
        assert_eq!(out.scheduled[1].scheduled_start, 30.0);
        assert_eq!(fleet.total_cost(), 1.0);
    }

    #[test]
    fn deadline_forces_new_instance() {
        let mut fleet = pool(class("small", 1.0, 1.0, 100.0, Capacity::Unlimited));
        let mut ledger = WorkloadLedger::new();

        let out = ElasticCost::default().compute(
            vec![timed(1, 30.0, 40.0), timed(2, 30.0, 40.0)],
            &mut fleet,
            &mut ledger,
            0.0,
        );

        assert_eq!(fleet.len(), 2);
        assert!(out.scheduled.iter().all(|t| t.scheduled_start == 0.0));
        assert_eq!(fleet.total_cost(), 2.0);
    }

    #[test]
    fn deadline_is_checked_in_absolute_time_on_shifted_ledger() {
        let resources = vec![Resource::new(1, 1.0).unwrap()];
        let classes = vec![class("small", 1.0, 1.0, 100.0, Capacity::Unlimited)];
        let mut fleet = Fleet::new(resources, classes).unwrap();
        let mut ledger = WorkloadLedger::new();
        ledger.track(1);
        ledger.shift_back(200.0);

        let late = Task::new(1, 100.0, 150.0).unwrap().with_deadline(60.0).unwrap();
        let out = ElasticCost::default().compute(vec![late], &mut fleet, &mut ledger, 0.0);

        // Finishing at ledger time 100 means absolute 300, past 210.
        assert!(out.scheduled.is_empty());
        assert_eq!(out.unscheduled.len(), 1);
        assert_eq!(fleet.len(), 1);

        let roomy = Task::new(2, 100.0, 150.0).unwrap().with_deadline(150.0).unwrap();
        let out = ElasticCost::default().compute(vec![roomy], &mut fleet, &mut ledger, 0.0);

        let task = &out.scheduled[0];
        assert_eq!(task.resource, Some(1));
        assert_eq!(task.scheduled_start, 0.0);
        assert!(ledger.absolute(ledger.get(1)) <= task.absolute_deadline());
    }

    #[test]
    fn picks_cheapest_feasible_class() {
        let classes = vec![
            class("fast", 4.0, 3.0, 100.0, Capacity::Unlimited),
            class("slow", 1.0, 1.0, 100.0, Capacity::Unlimited),
        ];
        let mut fleet = Fleet::new(Vec::new(), classes).unwrap();
        let mut ledger = WorkloadLedger::new();

        // slow: exec 200 -> cost 2; fast: exec 50 -> cost 3.
        ElasticCost::default().compute(vec![timed(1, 200.0, 1000.0)], &mut fleet, &mut ledger, 0.0);
        assert_eq!(fleet.resources()[0].class.as_ref().unwrap().name, "slow");

        // With a tight deadline only the fast class qualifies.
        ElasticCost::default().compute(vec![timed(2, 200.0, 60.0)], &mut fleet, &mut ledger, 0.0);
        assert_eq!(fleet.resources()[1].class.as_ref().unwrap().name, "fast");
    }

    #[test]
    fn free_private_resource_wins() {
        let resources = vec![Resource::new(1, 1.0).unwrap()];
        let classes = vec![class("small", 1.0, 1.0, 100.0, Capacity::Unlimited)];
        let mut fleet = Fleet::new(resources, classes).unwrap();
        let mut ledger = WorkloadLedger::new();

        let out =
            ElasticCost::default().compute(vec![timed(1, 10.0, 100.0)], &mut fleet, &mut ledger, 0.0);

        assert_eq!(out.scheduled[0].resource, Some(1));
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn existing_resource_starts_no_earlier_than_now() {
        let resources = vec![Resource::new(1, 1.0).unwrap()];
        let mut fleet = Fleet::with_resources(resources).unwrap();
        let mut ledger = WorkloadLedger::new();

        let task = Task::new(1, 10.0, 0.0).unwrap();
        let out = ElasticCost::default().compute(vec![task], &mut fleet, &mut ledger, 200.0);

        assert_eq!(out.scheduled[0].scheduled_start, 200.0);
        assert_eq!(ledger.get(1), 210.0);
    }

    #[test]
    fn exhausted_class_is_skipped() {
        let mut fleet = pool(class("one", 1.0, 1.0, 100.0, Capacity::Limited(1)));
        let mut ledger = WorkloadLedger::new();

        let out = ElasticCost::default().compute(
            vec![timed(1, 50.0, 60.0), timed(2, 50.0, 60.0)],
            &mut fleet,
            &mut ledger,
            0.0,
        );

        assert_eq!(out.scheduled.len(), 1);
        assert_eq!(out.unscheduled.len(), 1);
        assert_eq!(out.unscheduled[0].id, 2);
        assert!(!fleet.class("one").unwrap().is_available());
    }

    #[test]
    fn infeasible_policy() {
        let make = || pool(class("small", 1.0, 1.0, 100.0, Capacity::Unlimited));

        let mut fleet = make();
        let mut ledger = WorkloadLedger::new();
        let out =
            ElasticCost::default().compute(vec![timed(1, 100.0, 5.0)], &mut fleet, &mut ledger, 0.0);
        assert_eq!(out.unscheduled.len(), 1);
        assert!(fleet.is_empty());

        let mut fleet = make();
        let mut ledger = WorkloadLedger::new();
        let out = ElasticCost::new(InfeasiblePolicy::CheapestCandidate).compute(
            vec![timed(1, 100.0, 5.0)],
            &mut fleet,
            &mut ledger,
            0.0,
        );
        assert_eq!(out.scheduled.len(), 1);
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn committed_tasks_are_kept() {
        let mut fleet = Fleet::default();
        let mut ledger = WorkloadLedger::new();
        let mut task = Task::new(1, 10.0, 0.0).unwrap();
        task.assign(4, 7.0);

        let out = ElasticCost::default().compute(vec![task.clone()], &mut fleet, &mut ledger, 0.0);
        assert_eq!(out.scheduled, vec![task]);
        assert!(ledger.is_empty());
    }
}
