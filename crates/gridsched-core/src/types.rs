//! Domain types for tasks, resources and priced resource classes.
//!
//! Tasks and resources are single concrete types carrying every optional
//! field (deadline, class back-reference) instead of a type hierarchy.
//! All types are serializable so reports can be emitted as JSON.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Unique identifier for a task.
pub type TaskId = u64;

/// Unique identifier for a resource (VM) within a fleet.
pub type ResourceId = u64;

// ── Task ──────────────────────────────────────────────────────────

/// A unit of work with a length, an arrival time and an optional deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    /// Work units; execution time on a resource is `length / speed`.
    pub length: f64,
    /// Parallelism requirement, always at least 1.
    pub units: u32,
    /// Relative deadline: execution must finish by `arrival + deadline`.
    pub deadline: Option<f64>,
    /// Time at which the task becomes schedulable.
    pub arrival: f64,
    /// Resource the task is committed to, if any.
    pub resource: Option<ResourceId>,
    /// Earliest time the execution substrate may start the task.
    pub scheduled_start: f64,
}

impl Task {
    /// Create an unassigned task without a deadline.
    pub fn new(id: TaskId, length: f64, arrival: f64) -> CoreResult<Self> {
        if !length.is_finite() || length < 0.0 {
            return Err(CoreError::InvalidLength { task: id, length });
        }
        if !arrival.is_finite() || arrival < 0.0 {
            return Err(CoreError::InvalidArrival { task: id, arrival });
        }
        Ok(Self {
            id,
            length,
            units: 1,
            deadline: None,
            arrival,
            resource: None,
            scheduled_start: 0.0,
        })
    }

    /// Attach a relative deadline.
    pub fn with_deadline(mut self, deadline: f64) -> CoreResult<Self> {
        if deadline.is_nan() || deadline < 0.0 {
            return Err(CoreError::InvalidDeadline {
                task: self.id,
                deadline,
            });
        }
        self.deadline = Some(deadline);
        Ok(self)
    }

    /// Set the parallelism requirement (clamped to at least 1).
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units.max(1);
        self
    }

    /// Absolute time by which the task must finish (`+inf` without deadline).
    pub fn absolute_deadline(&self) -> f64 {
        match self.deadline {
            Some(d) => self.arrival + d,
            None => f64::INFINITY,
        }
    }

    /// Whether finishing at `completion` honours the deadline.
    pub fn meets_deadline(&self, completion: f64) -> bool {
        completion <= self.absolute_deadline()
    }

    pub fn is_assigned(&self) -> bool {
        self.resource.is_some()
    }

    /// Commit the task to a resource, starting at `start`.
    pub fn assign(&mut self, resource: ResourceId, start: f64) {
        self.resource = Some(resource);
        self.scheduled_start = start;
    }

    /// Drop the resource commitment and restamp the start time.
    pub fn release(&mut self, start: f64) {
        self.resource = None;
        self.scheduled_start = start;
    }
}

// ── Pricing ───────────────────────────────────────────────────────

/// Price charged per started `interval` of uptime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    pub price: f64,
    pub interval: f64,
}

impl Pricing {
    /// Cost of keeping a resource up for `duration`: every started
    /// interval is billed in full.
    pub fn cost_for(&self, duration: f64) -> f64 {
        (duration / self.interval).ceil() * self.price
    }
}

/// Back-reference from a resource to the class it was created from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassRef {
    pub name: String,
    pub pricing: Pricing,
}

// ── Resource ──────────────────────────────────────────────────────

/// An execution unit (VM) with a fixed processing speed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    /// Processing units per time unit.
    pub speed: f64,
    /// Total predicted busy time committed to this resource.
    pub uptime: f64,
    /// Amount billed so far for `uptime`.
    pub cost: f64,
    /// Class this resource was instantiated from, if any.
    pub class: Option<ClassRef>,
}

impl Resource {
    pub fn new(id: ResourceId, speed: f64) -> CoreResult<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(CoreError::InvalidSpeed { resource: id, speed });
        }
        Ok(Self {
            id,
            speed,
            uptime: 0.0,
            cost: 0.0,
            class: None,
        })
    }

    pub fn with_class(mut self, class: ClassRef) -> Self {
        self.class = Some(class);
        self
    }

    /// Predicted execution time of `task` on this resource.
    pub fn exec_time(&self, task: &Task) -> f64 {
        task.length / self.speed
    }

    /// Extra amount that would be billed if `exec` more time units were
    /// committed. Resources without a class are free.
    pub fn marginal_cost(&self, exec: f64) -> f64 {
        match &self.class {
            Some(class) => class.pricing.cost_for(self.uptime + exec) - self.cost,
            None => 0.0,
        }
    }

    /// Account for `exec` more time units of uptime and rebill.
    pub fn charge(&mut self, exec: f64) {
        self.uptime += exec;
        if let Some(class) = &self.class {
            self.cost = class.pricing.cost_for(self.uptime);
        }
    }

    /// Undo a previous [`Resource::charge`] of `exec` time units.
    pub fn refund(&mut self, exec: f64) {
        self.uptime = (self.uptime - exec).max(0.0);
        if let Some(class) = &self.class {
            self.cost = class.pricing.cost_for(self.uptime);
        }
    }
}

// ── Resource class ────────────────────────────────────────────────

/// How many more instances a class may spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Unlimited,
    Limited(u32),
}

impl Capacity {
    pub fn is_available(&self) -> bool {
        match self {
            Capacity::Unlimited => true,
            Capacity::Limited(n) => *n > 0,
        }
    }

    /// Consume one instance slot. Returns `false` when exhausted.
    fn take(&mut self) -> bool {
        match self {
            Capacity::Unlimited => true,
            Capacity::Limited(0) => false,
            Capacity::Limited(n) => {
                *n -= 1;
                true
            }
        }
    }
}

/// A priced, capacity-limited template from which resources are created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceClass {
    pub name: String,
    /// Speed of every instance of this class.
    pub speed: f64,
    pub pricing: Pricing,
    /// Remaining instances; only ever decreases.
    pub capacity: Capacity,
}

impl ResourceClass {
    pub fn new(
        name: impl Into<String>,
        speed: f64,
        price: f64,
        price_interval: f64,
        capacity: Capacity,
    ) -> CoreResult<Self> {
        let name = name.into();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(CoreError::InvalidPricing {
                class: name,
                reason: format!("speed must be positive, got {speed}"),
            });
        }
        if !price_interval.is_finite() || price_interval <= 0.0 {
            return Err(CoreError::InvalidPricing {
                class: name,
                reason: format!("price interval must be positive, got {price_interval}"),
            });
        }
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::InvalidPricing {
                class: name,
                reason: format!("price must be non-negative, got {price}"),
            });
        }
        Ok(Self {
            name,
            speed,
            pricing: Pricing {
                price,
                interval: price_interval,
            },
            capacity,
        })
    }

    pub fn is_available(&self) -> bool {
        self.capacity.is_available()
    }

    /// Predicted execution time of `task` on a fresh instance.
    pub fn exec_time(&self, task: &Task) -> f64 {
        task.length / self.speed
    }

    /// Cost of running `task` alone on a brand-new instance.
    pub fn launch_cost(&self, task: &Task) -> f64 {
        self.pricing.cost_for(self.exec_time(task))
    }

    /// Spawn a new resource with the given id, consuming one slot.
    pub fn instantiate(&mut self, id: ResourceId) -> CoreResult<Resource> {
        if !self.capacity.take() {
            return Err(CoreError::CapacityExhausted(self.name.clone()));
        }
        Ok(Resource {
            id,
            speed: self.speed,
            uptime: 0.0,
            cost: 0.0,
            class: Some(ClassRef {
                name: self.name.clone(),
                pricing: self.pricing,
            }),
        })
    }
}

// ── Assignment ────────────────────────────────────────────────────

/// Outbound record handed to the execution substrate for a committed task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub task_id: TaskId,
    /// `None` only when scheduling is disabled (pass-through).
    pub resource_id: Option<ResourceId>,
    pub scheduled_start: f64,
}

impl From<&Task> for Assignment {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id,
            resource_id: task.resource,
            scheduled_start: task.scheduled_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_rejects_negative_length() {
        let err = Task::new(1, -5.0, 0.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLength { task: 1, .. }));
    }

    #[test]
    fn task_rejects_negative_arrival() {
        assert!(Task::new(1, 5.0, -1.0).is_err());
    }

    #[test]
    fn units_are_clamped_to_one() {
        let task = Task::new(1, 10.0, 0.0).unwrap().with_units(0);
        assert_eq!(task.units, 1);
    }

    #[test]
    fn absolute_deadline_adds_arrival() {
        let task = Task::new(1, 10.0, 40.0).unwrap().with_deadline(60.0).unwrap();
        assert_eq!(task.absolute_deadline(), 100.0);
        assert!(task.meets_deadline(100.0));
        assert!(!task.meets_deadline(100.5));
    }

    #[test]
    fn no_deadline_is_always_met() {
        let task = Task::new(1, 10.0, 0.0).unwrap();
        assert!(task.meets_deadline(1e12));
    }

    #[test]
    fn resource_rejects_zero_speed() {
        assert!(matches!(
            Resource::new(3, 0.0),
            Err(CoreError::InvalidSpeed { resource: 3, .. })
        ));
    }

    #[test]
    fn pricing_bills_started_intervals() {
        let pricing = Pricing {
            price: 2.0,
            interval: 100.0,
        };
        assert_eq!(pricing.cost_for(0.0), 0.0);
        assert_eq!(pricing.cost_for(1.0), 2.0);
        assert_eq!(pricing.cost_for(100.0), 2.0);
        assert_eq!(pricing.cost_for(101.0), 4.0);
    }

    #[test]
    fn charge_and_marginal_cost() {
        let mut class = ResourceClass::new("small", 1.0, 1.0, 100.0, Capacity::Unlimited).unwrap();
        let mut vm = class.instantiate(7).unwrap();
        assert_eq!(vm.marginal_cost(50.0), 1.0);

        vm.charge(50.0);
        assert_eq!(vm.cost, 1.0);
        // Still inside the first paid interval.
        assert_eq!(vm.marginal_cost(40.0), 0.0);
        assert_eq!(vm.marginal_cost(60.0), 1.0);

        vm.charge(70.0);
        assert_eq!(vm.cost, 2.0);
        vm.refund(70.0);
        assert_eq!(vm.uptime, 50.0);
        assert_eq!(vm.cost, 1.0);
    }

    #[test]
    fn unclassed_resource_is_free() {
        let mut vm = Resource::new(1, 2.0).unwrap();
        assert_eq!(vm.marginal_cost(1000.0), 0.0);
        vm.charge(10.0);
        assert_eq!(vm.uptime, 10.0);
        assert_eq!(vm.cost, 0.0);
    }

    #[test]
    fn limited_class_exhausts() {
        let mut class = ResourceClass::new("one", 1.0, 1.0, 10.0, Capacity::Limited(1)).unwrap();
        assert!(class.instantiate(1).is_ok());
        assert_eq!(class.capacity, Capacity::Limited(0));
        assert!(!class.is_available());
        assert_eq!(
            class.instantiate(2),
            Err(CoreError::CapacityExhausted("one".to_string()))
        );
    }

    #[test]
    fn class_rejects_zero_interval() {
        let err = ResourceClass::new("bad", 1.0, 1.0, 0.0, Capacity::Unlimited).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPricing { .. }));
    }

    #[test]
    fn assignment_from_task() {
        let mut task = Task::new(9, 10.0, 0.0).unwrap();
        task.assign(4, 25.0);
        let a = Assignment::from(&task);
        assert_eq!(a.task_id, 9);
        assert_eq!(a.resource_id, Some(4));
        assert_eq!(a.scheduled_start, 25.0);

        task.release(100.0);
        assert!(!task.is_assigned());
        assert_eq!(task.scheduled_start, 100.0);
    }
}
