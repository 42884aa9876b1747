//! gridsched-core — data model shared by every scheduling crate.
//!
//! Holds the task / resource / resource-class types, the per-resource
//! workload ledger used to predict availability, the fleet container that
//! owns live resources and the priced class catalog, and the TOML scenario
//! configuration.

pub mod config;
pub mod error;
pub mod fleet;
pub mod ledger;
pub mod types;

pub use config::ScenarioConfig;
pub use error::{CoreError, CoreResult};
pub use fleet::Fleet;
pub use ledger::WorkloadLedger;
pub use types::*;
