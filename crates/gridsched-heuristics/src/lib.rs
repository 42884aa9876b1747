//! gridsched list-scheduling heuristics.
//!
//! Every heuristic maps a batch of tasks, the live fleet and the
//! workload ledger to a set of commitments. Heuristics never fail:
//! tasks they cannot place come back in [`Outcome::unscheduled`].
//!
//! # Components
//!
//! - **`heuristic`** — the [`Heuristic`] trait and shared ledger helpers
//! - **`work_queue`** — least-loaded resource, tasks in input order
//! - **`min_min`** — MinMin and MaxMin
//! - **`min_max`** — execution-ratio driven MinMax
//! - **`sufferage`** — largest second-best penalty first
//! - **`ljfr_sjfr`** — MaxMin warm-up, then alternating MinMin / MaxMin
//! - **`deadline`** — sorted greedy placement with deadline admission
//! - **`null`** — pass-through, disables scheduling

pub mod deadline;
pub mod heuristic;
pub mod ljfr_sjfr;
pub mod min_max;
pub mod min_min;
pub mod null;
pub mod sufferage;
pub mod work_queue;

pub use deadline::{DeadlineAware, TaskOrder};
pub use heuristic::{Heuristic, Outcome, commit, completion};
pub use ljfr_sjfr::LjfrSjfr;
pub use min_max::MinMax;
pub use min_min::{MaxMin, MinMin};
pub use null::Null;
pub use sufferage::Sufferage;
pub use work_queue::WorkQueue;
