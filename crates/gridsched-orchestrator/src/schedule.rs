//! Final schedule and per-window statistics.

use serde::{Deserialize, Serialize};

use gridsched_core::{Assignment, Resource, Task};

/// What happened in one scheduling window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowReport {
    pub window_end: f64,
    /// Tasks handed to the heuristic, including reclaimed ones.
    pub submitted: usize,
    pub scheduled: usize,
    pub unscheduled: usize,
    /// Committed tasks pulled back into this window before scheduling.
    pub rescheduled: usize,
    /// Resources created from classes during this window.
    pub provisioned: usize,
}

impl WindowReport {
    /// Fold the public side of a hybrid window into the private report.
    /// Tasks the public side placed count as scheduled; only what it left
    /// behind stays unscheduled.
    pub fn absorb_public(&mut self, public: &WindowReport) {
        self.scheduled += public.scheduled;
        self.unscheduled = public.unscheduled;
        self.provisioned += public.provisioned;
    }
}

/// Result of a full batch preparation, ready for the execution substrate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    /// One record per scheduled task, in commitment order.
    pub assignments: Vec<Assignment>,
    pub scheduled: Vec<Task>,
    pub unscheduled: Vec<Task>,
    /// Every resource the schedule refers to, provisioned ones included.
    pub resources: Vec<Resource>,
    pub windows: Vec<WindowReport>,
    /// Sum of what every resource has been billed.
    pub total_cost: f64,
    /// Latest predicted completion over all assigned tasks.
    pub makespan: f64,
}

impl Schedule {
    pub fn new(
        scheduled: Vec<Task>,
        unscheduled: Vec<Task>,
        resources: Vec<Resource>,
        windows: Vec<WindowReport>,
    ) -> Self {
        let assignments = scheduled.iter().map(Assignment::from).collect();
        let total_cost = resources.iter().map(|r| r.cost).sum();
        let makespan = scheduled
            .iter()
            .filter_map(|task| {
                let id = task.resource?;
                let resource = resources.iter().find(|r| r.id == id)?;
                Some(task.scheduled_start + resource.exec_time(task))
            })
            .fold(0.0, f64::max);

        Self {
            assignments,
            scheduled,
            unscheduled,
            resources,
            windows,
            total_cost,
            makespan,
        }
    }

    /// Number of tasks that ended up on a resource.
    pub fn assigned_count(&self) -> usize {
        self.scheduled.iter().filter(|t| t.is_assigned()).count()
    }

    /// Tasks per resource id, in fleet order.
    pub fn load_by_resource(&self) -> Vec<(u64, usize)> {
        self.resources
            .iter()
            .map(|r| {
                let n = self
                    .scheduled
                    .iter()
                    .filter(|t| t.resource == Some(r.id))
                    .count();
                (r.id, n)
            })
            .collect()
    }
}
