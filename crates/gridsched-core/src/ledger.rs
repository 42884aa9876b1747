//! Workload ledger — predicted "busy-until" time per resource.
//!
//! The ledger is owned by exactly one scheduling session and passed by
//! `&mut` into every heuristic call. Entries are created lazily with a
//! value of `0.0`.
//!
//! Two advance operations exist and are deliberately kept apart:
//!
//! - [`WorkloadLedger::clamp_to_at_least`] keeps values on an absolute
//!   time axis: nothing can be predicted to start before `time`.
//! - [`WorkloadLedger::shift_back`] keeps values relative to the last
//!   reschedule: `elapsed` time units of outstanding work are consumed
//!   and the ledger's origin moves forward by `elapsed`.
//!
//! Which one applies is chosen by the orchestrator. Deadlines are
//! absolute, so anything compared against one goes through
//! [`WorkloadLedger::absolute`] first.

use std::collections::HashMap;

use crate::types::ResourceId;

#[derive(Debug, Clone, Default)]
pub struct WorkloadLedger {
    busy_until: HashMap<ResourceId, f64>,
    /// Absolute time that a ledger value of `0.0` stands for.
    origin: f64,
}

impl WorkloadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predicted time at which `resource` becomes free (0 if never seen).
    pub fn get(&self, resource: ResourceId) -> f64 {
        self.busy_until.get(&resource).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, resource: ResourceId, value: f64) {
        self.busy_until.insert(resource, value);
    }

    /// Make sure `resource` has an entry so that advances apply to it.
    pub fn track(&mut self, resource: ResourceId) {
        self.busy_until.entry(resource).or_insert(0.0);
    }

    pub fn is_tracked(&self, resource: ResourceId) -> bool {
        self.busy_until.contains_key(&resource)
    }

    /// Remove `exec` time units of committed work from `resource`.
    pub fn reclaim(&mut self, resource: ResourceId, exec: f64) {
        let value = self.get(resource) - exec;
        self.set(resource, value);
    }

    /// `value = max(value, time)` for every tracked resource.
    pub fn clamp_to_at_least(&mut self, time: f64) {
        for value in self.busy_until.values_mut() {
            *value = value.max(time);
        }
    }

    /// `value = max(0, value - elapsed)` for every tracked resource.
    pub fn shift_back(&mut self, elapsed: f64) {
        for value in self.busy_until.values_mut() {
            *value = (*value - elapsed).max(0.0);
        }
        self.origin += elapsed;
    }

    /// Absolute time of ledger value `0.0`. Stays at zero unless the
    /// ledger has been shifted back.
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Convert a time on the ledger's axis to absolute time.
    pub fn absolute(&self, value: f64) -> f64 {
        self.origin + value
    }

    /// Latest predicted busy-until value across all resources.
    pub fn horizon(&self) -> f64 {
        self.busy_until.values().copied().fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.busy_until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.busy_until.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, f64)> + '_ {
        self.busy_until.iter().map(|(id, v)| (*id, *v))
    }
}
