//! gridsched-orchestrator — windowed online scheduling on top of the
//! heuristic library.
//!
//! Tasks are replayed in arrival order and grouped into windows aligned
//! to a scheduling interval. At the end of every window the orchestrator
//! optionally reclaims committed tasks that have not started yet,
//! advances the workload ledger, and hands the window to its heuristic.
//!
//! # Components
//!
//! - **`window`** — arrival-ordered window replay
//! - **`batch`** — [`BatchOrchestrator`]: one heuristic, one fleet, one ledger
//! - **`hybrid`** — [`HybridOrchestrator`]: private orchestrator with a
//!   public (usually elastic) one taking its overflow
//! - **`schedule`** — the final [`Schedule`] and per-window reports
//! - **`factory`** — heuristic construction from configuration
//! - **`convert`** — configuration to validated runtime values
//! - **`scenario`** — one-call entry point for a whole scenario
//!
//! # Window loop
//!
//! ```text
//! window_end = interval
//! for task in tasks (sorted by arrival):
//!     if task.arrival > window_end:
//!         run_window(window, window_end)
//!         advance window_end by interval until >= task.arrival
//!     task.scheduled_start = window_end
//!     window.push(task)
//! run_window(window, window_end)
//! ```

pub mod batch;
pub mod convert;
pub mod error;
pub mod factory;
pub mod hybrid;
pub mod scenario;
pub mod schedule;
pub mod window;

pub use batch::{BatchOrchestrator, Rescheduling, Settings};
pub use error::{OrchestratorError, OrchestratorResult};
pub use factory::{build_heuristic, infeasible_policy};
pub use hybrid::HybridOrchestrator;
pub use scenario::{Orchestrator, run_scenario};
pub use schedule::{Schedule, WindowReport};
pub use window::replay_windows;
