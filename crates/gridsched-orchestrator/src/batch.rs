//! Batch orchestrator — one heuristic over a replay of arrival windows.
//!
//! The orchestrator owns its fleet and its workload ledger. Before each
//! window it:
//!
//! 1. reclaims committed tasks that have not started yet (when
//!    rescheduling is enabled), refunding their ledger contribution;
//! 2. advances the ledger to the window end using the configured
//!    [`AdvanceMode`];
//! 3. runs the heuristic over the window and records a [`WindowReport`].

use tracing::{debug, info};

use gridsched_core::config::{AdvanceMode, ReschedulingConfig};
use gridsched_core::{Fleet, ResourceId, Task, TaskId, WorkloadLedger};
use gridsched_heuristics::Heuristic;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::schedule::{Schedule, WindowReport};
use crate::window::replay_windows;

// ── Settings ──────────────────────────────────────────────────────

/// When a committed, not yet started task is pulled back for
/// rescheduling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rescheduling {
    /// Commitments are final.
    #[default]
    Disabled,
    /// Reclaim when `now < scheduled_start`.
    Delay,
    /// Reclaim when `now + estimate < scheduled_start`, `estimate` being
    /// the time the scheduler itself is expected to need.
    DelayPlusEstimate { estimate: f64 },
}

impl Rescheduling {
    /// Whether a task due to start at `start` should be reclaimed at `now`.
    pub fn should_reclaim(&self, now: f64, start: f64) -> bool {
        match *self {
            Rescheduling::Disabled => false,
            Rescheduling::Delay => now < start,
            Rescheduling::DelayPlusEstimate { estimate } => now + estimate < start,
        }
    }
}

impl From<ReschedulingConfig> for Rescheduling {
    fn from(config: ReschedulingConfig) -> Self {
        match config {
            ReschedulingConfig::Disabled => Rescheduling::Disabled,
            ReschedulingConfig::Delay => Rescheduling::Delay,
            ReschedulingConfig::DelayPlusEstimate { estimate } => {
                Rescheduling::DelayPlusEstimate { estimate }
            }
        }
    }
}

/// Validated orchestrator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    interval: f64,
    advance: AdvanceMode,
    rescheduling: Rescheduling,
}

impl Settings {
    /// Clamp advance, no rescheduling.
    pub fn new(interval: f64) -> OrchestratorResult<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(OrchestratorError::InvalidInterval(interval));
        }
        Ok(Self {
            interval,
            advance: AdvanceMode::default(),
            rescheduling: Rescheduling::default(),
        })
    }

    pub fn with_advance(mut self, advance: AdvanceMode) -> Self {
        self.advance = advance;
        self
    }

    pub fn with_rescheduling(mut self, rescheduling: Rescheduling) -> OrchestratorResult<Self> {
        if let Rescheduling::DelayPlusEstimate { estimate } = rescheduling {
            if !estimate.is_finite() || estimate < 0.0 {
                return Err(OrchestratorError::InvalidEstimate(estimate));
            }
        }
        self.rescheduling = rescheduling;
        Ok(self)
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn advance(&self) -> AdvanceMode {
        self.advance
    }

    pub fn rescheduling(&self) -> Rescheduling {
        self.rescheduling
    }
}

// ── Orchestrator ──────────────────────────────────────────────────

pub struct BatchOrchestrator {
    heuristic: Box<dyn Heuristic>,
    fleet: Fleet,
    ledger: WorkloadLedger,
    settings: Settings,
    committed: Vec<Task>,
    unscheduled: Vec<Task>,
    windows: Vec<WindowReport>,
    last_window_end: f64,
}

impl BatchOrchestrator {
    pub fn new(heuristic: Box<dyn Heuristic>, fleet: Fleet, settings: Settings) -> Self {
        Self {
            heuristic,
            fleet,
            ledger: WorkloadLedger::new(),
            settings,
            committed: Vec::new(),
            unscheduled: Vec::new(),
            windows: Vec::new(),
            last_window_end: 0.0,
        }
    }

    pub fn heuristic_name(&self) -> &'static str {
        self.heuristic.name()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn ledger(&self) -> &WorkloadLedger {
        &self.ledger
    }

    /// Tasks currently committed, in commitment order.
    pub fn committed(&self) -> &[Task] {
        &self.committed
    }

    /// Tasks given up on so far.
    pub fn unscheduled(&self) -> &[Task] {
        &self.unscheduled
    }

    pub fn windows(&self) -> &[WindowReport] {
        &self.windows
    }

    /// Replay `tasks` window by window and return the resulting schedule.
    pub fn prepare_batch(&mut self, tasks: Vec<Task>) -> Schedule {
        info!(
            heuristic = self.heuristic_name(),
            tasks = tasks.len(),
            resources = self.fleet.len(),
            interval = self.settings.interval,
            "preparing batch"
        );

        let interval = self.settings.interval;
        replay_windows(tasks, interval, |window, window_end| {
            let left = self.run_window(window, window_end);
            self.unscheduled.extend(left);
        });

        let schedule = self.schedule();
        info!(
            heuristic = self.heuristic_name(),
            scheduled = schedule.scheduled.len(),
            unscheduled = schedule.unscheduled.len(),
            windows = schedule.windows.len(),
            makespan = schedule.makespan,
            cost = schedule.total_cost,
            "batch prepared"
        );
        schedule
    }

    /// Snapshot of the current state as a [`Schedule`].
    pub fn schedule(&self) -> Schedule {
        Schedule::new(
            self.committed.clone(),
            self.unscheduled.clone(),
            self.fleet.resources().to_vec(),
            self.windows.clone(),
        )
    }

    /// Schedule one window ending at `window_end`. Returns the tasks the
    /// heuristic could not place; the caller decides what happens to them.
    ///
    /// Tasks in `pending` that are already bound to a resource are kept
    /// as committed without going through the heuristic.
    pub fn run_window(&mut self, pending: Vec<Task>, window_end: f64) -> Vec<Task> {
        let (bound, mut pending): (Vec<Task>, Vec<Task>) =
            pending.into_iter().partition(Task::is_assigned);
        let kept = bound.len();
        self.committed.extend(bound);

        let rescheduled = self.reclaim_unstarted(window_end, &mut pending);
        let now = self.advance_ledger(window_end);

        let submitted = pending.len();
        let fleet_before = self.fleet.len();
        let outcome = self
            .heuristic
            .compute(pending, &mut self.fleet, &mut self.ledger, now);

        let mut scheduled = outcome.scheduled;
        if self.settings.advance == AdvanceMode::ShiftBack {
            // The ledger is relative to its origin; stamps are absolute.
            let origin = self.ledger.origin();
            for task in scheduled.iter_mut().filter(|t| t.is_assigned()) {
                task.scheduled_start += origin;
            }
        }

        let report = WindowReport {
            window_end,
            submitted,
            scheduled: scheduled.len() + kept,
            unscheduled: outcome.unscheduled.len(),
            rescheduled,
            provisioned: self.fleet.len() - fleet_before,
        };
        debug!(
            heuristic = self.heuristic_name(),
            window_end,
            submitted = report.submitted,
            scheduled = report.scheduled,
            unscheduled = report.unscheduled,
            rescheduled = report.rescheduled,
            "window scheduled"
        );
        self.windows.push(report);
        self.committed.extend(scheduled);

        outcome.unscheduled
    }

    /// Pull a committed task back out of the schedule, restoring the
    /// ledger to its value before the commitment. The task is restamped
    /// with `now` as its earliest start.
    pub fn unschedule(&mut self, task: TaskId, now: f64) -> Option<Task> {
        let pos = self.committed.iter().position(|t| t.id == task)?;
        let mut task = self.committed.remove(pos);
        self.release(&mut task, now);
        Some(task)
    }

    /// Keep provisioned resource ids clear of `id` and everything below.
    pub(crate) fn reserve_resource_ids_through(&mut self, id: ResourceId) {
        self.fleet.reserve_ids_through(id);
    }

    pub(crate) fn disable_rescheduling(&mut self) {
        self.settings.rescheduling = Rescheduling::Disabled;
    }

    pub(crate) fn park_unscheduled(&mut self, tasks: Vec<Task>) {
        self.unscheduled.extend(tasks);
    }

    fn reclaim_unstarted(&mut self, now: f64, pending: &mut Vec<Task>) -> usize {
        let rule = self.settings.rescheduling;
        if rule == Rescheduling::Disabled {
            return 0;
        }

        let (reclaimed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.committed)
            .into_iter()
            .partition(|t| t.is_assigned() && rule.should_reclaim(now, t.scheduled_start));
        self.committed = kept;

        let count = reclaimed.len();
        for mut task in reclaimed {
            debug!(
                task = task.id,
                resource = task.resource,
                start = task.scheduled_start,
                now,
                "reclaiming unstarted task"
            );
            self.release(&mut task, now);
            pending.push(task);
        }
        count
    }

    fn release(&mut self, task: &mut Task, now: f64) {
        if let Some(id) = task.resource {
            if let Some(resource) = self.fleet.resource_mut(id) {
                let exec = resource.exec_time(task);
                resource.refund(exec);
                self.ledger.reclaim(id, exec);
            }
        }
        task.release(now);
    }

    /// Advance the ledger to `window_end`; returns the reference time the
    /// heuristic must use.
    fn advance_ledger(&mut self, window_end: f64) -> f64 {
        let now = match self.settings.advance {
            AdvanceMode::Clamp => {
                for resource in self.fleet.resources() {
                    self.ledger.track(resource.id);
                }
                self.ledger.clamp_to_at_least(window_end);
                window_end
            }
            AdvanceMode::ShiftBack => {
                self.ledger.shift_back(window_end - self.last_window_end);
                0.0
            }
        };
        self.last_window_end = window_end;
        now
    }
}
