//! Hybrid orchestrator — a private orchestrator backed by a public one.
//!
//! Both sides see the same windows. In every window the private side
//! schedules first; whatever it cannot place is handed to the public
//! side (usually the elastic cost algorithm) at the same window end.
//! Tasks the public side also rejects are final.
//!
//! Rescheduling, when configured, applies to the private side only.

use tracing::info;

use gridsched_core::{CoreError, Task};

use crate::batch::BatchOrchestrator;
use crate::error::OrchestratorResult;
use crate::schedule::Schedule;
use crate::window::replay_windows;

pub struct HybridOrchestrator {
    private: BatchOrchestrator,
    public: BatchOrchestrator,
}

impl HybridOrchestrator {
    /// Combine two orchestrators. The private side's interval drives the
    /// windows. Fails when both fleets start with the same resource id.
    pub fn new(
        private: BatchOrchestrator,
        mut public: BatchOrchestrator,
    ) -> OrchestratorResult<Self> {
        for resource in public.fleet().resources() {
            if private.fleet().resource(resource.id).is_some() {
                return Err(CoreError::DuplicateResource(resource.id).into());
            }
        }

        let highest = private
            .fleet()
            .resources()
            .iter()
            .chain(public.fleet().resources())
            .map(|r| r.id)
            .max();
        if let Some(id) = highest {
            public.reserve_resource_ids_through(id);
        }
        public.disable_rescheduling();

        Ok(Self { private, public })
    }

    pub fn private(&self) -> &BatchOrchestrator {
        &self.private
    }

    pub fn public(&self) -> &BatchOrchestrator {
        &self.public
    }

    /// Schedule one window on both sides. Returns what neither side
    /// could place.
    pub fn run_window(&mut self, pending: Vec<Task>, window_end: f64) -> Vec<Task> {
        let overflow = self.private.run_window(pending, window_end);
        self.public.run_window(overflow, window_end)
    }

    pub fn prepare_batch(&mut self, tasks: Vec<Task>) -> Schedule {
        info!(
            private = self.private.heuristic_name(),
            public = self.public.heuristic_name(),
            tasks = tasks.len(),
            "preparing hybrid batch"
        );

        let interval = self.private.settings().interval();
        replay_windows(tasks, interval, |window, window_end| {
            let rejected = self.run_window(window, window_end);
            self.public.park_unscheduled(rejected);
        });

        let schedule = self.schedule();
        info!(
            scheduled = schedule.scheduled.len(),
            unscheduled = schedule.unscheduled.len(),
            provisioned = schedule.windows.iter().map(|w| w.provisioned).sum::<usize>(),
            cost = schedule.total_cost,
            "hybrid batch prepared"
        );
        schedule
    }

    /// Both sides merged: private commitments first, then public ones.
    pub fn schedule(&self) -> Schedule {
        let private = self.private.schedule();
        let public = self.public.schedule();

        let mut scheduled = private.scheduled;
        scheduled.extend(public.scheduled);

        let mut unscheduled = private.unscheduled;
        unscheduled.extend(public.unscheduled);

        let mut resources = private.resources;
        resources.extend(public.resources);

        let windows = private
            .windows
            .into_iter()
            .zip(public.windows.iter())
            .map(|(mut window, public)| {
                window.absorb_public(public);
                window
            })
            .collect();

        Schedule::new(scheduled, unscheduled, resources, windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsched_core::{Capacity, Fleet, Resource, ResourceClass};
    use gridsched_elastic::ElasticCost;
    use gridsched_heuristics::DeadlineAware;

    use crate::batch::{Rescheduling, Settings};

    fn private_side(speeds: &[f64]) -> BatchOrchestrator {
        let resources = speeds
            .iter()
            .enumerate()
            .map(|(i, s)| Resource::new(i as u64, *s).unwrap())
            .collect();
        let settings = Settings::new(100.0)
            .unwrap()
            .with_rescheduling(Rescheduling::Delay)
            .unwrap();
        BatchOrchestrator::new(
            Box::new(DeadlineAware::deadline()),
            Fleet::with_resources(resources).unwrap(),
            settings,
        )
    }

    fn public_side(capacity: Capacity) -> BatchOrchestrator {
        let class = ResourceClass::new("pb", 2.0, 1.0, 100.0, capacity).unwrap();
        let settings = Settings::new(100.0)
            .unwrap()
            .with_rescheduling(Rescheduling::Delay)
            .unwrap();
        BatchOrchestrator::new(
            Box::new(ElasticCost::default()),
            Fleet::new(Vec::new(), vec![class]).unwrap(),
            settings,
        )
    }

    fn timed(id: u64, length: f64, arrival: f64, deadline: f64) -> Task {
        Task::new(id, length, arrival)
            .unwrap()
            .with_deadline(deadline)
            .unwrap()
    }

    #[test]
    fn overflow_goes_to_public_pool() {
        let mut hybrid =
            HybridOrchestrator::new(private_side(&[1.0]), public_side(Capacity::Unlimited)).unwrap();

        // Window end 100: private fits task 1 (100 + 50 <= 160) but not
        // task 2 behind it (150 + 50 > 190).
        let schedule =
            hybrid.prepare_batch(vec![timed(1, 50.0, 0.0, 160.0), timed(2, 50.0, 0.0, 190.0)]);

        assert!(schedule.unscheduled.is_empty());
        assert_eq!(schedule.scheduled.len(), 2);
        assert_eq!(schedule.scheduled[0].resource, Some(0));
        // Public ids continue after the private ones.
        assert_eq!(schedule.scheduled[1].resource, Some(1));
        assert_eq!(schedule.scheduled[1].scheduled_start, 100.0);
        assert_eq!(schedule.resources.len(), 2);
        assert_eq!(schedule.total_cost, 1.0);
        assert_eq!(schedule.windows[0].scheduled, 2);
        assert_eq!(schedule.windows[0].provisioned, 1);
    }

    #[test]
    fn public_rejections_are_final() {
        let mut hybrid =
            HybridOrchestrator::new(private_side(&[1.0]), public_side(Capacity::Limited(0))).unwrap();

        let schedule = hybrid.prepare_batch(vec![timed(1, 500.0, 0.0, 150.0)]);

        assert!(schedule.scheduled.is_empty());
        assert_eq!(schedule.unscheduled.len(), 1);
        assert_eq!(schedule.windows[0].unscheduled, 1);
        assert!(hybrid.private().unscheduled().is_empty());
    }

    #[test]
    fn public_side_never_reschedules() {
        let hybrid =
            HybridOrchestrator::new(private_side(&[1.0]), public_side(Capacity::Unlimited)).unwrap();
        assert_eq!(hybrid.public().settings().rescheduling(), Rescheduling::Disabled);
        assert_eq!(hybrid.private().settings().rescheduling(), Rescheduling::Delay);
    }

    #[test]
    fn overlapping_fleets_are_rejected() {
        let private = private_side(&[1.0]);
        let public = BatchOrchestrator::new(
            Box::new(ElasticCost::default()),
            Fleet::with_resources(vec![Resource::new(0, 1.0).unwrap()]).unwrap(),
            Settings::new(100.0).unwrap(),
        );
        assert!(HybridOrchestrator::new(private, public).is_err());
    }
}
