//! gridsched-elastic — cost-minimising placement on a priced, elastic pool.
//!
//! For every task the algorithm prices two kinds of candidates and picks
//! the cheapest one that still meets the task's deadline:
//!
//! ```text
//! existing resource r:
//!     start      = max(ledger[r], now)
//!     completion = start + length / r.speed
//!     cost       = ceil((r.uptime + exec) / interval) * price - r.cost
//!
//! class c with remaining capacity:
//!     completion = now + length / c.speed
//!     cost       = ceil(exec / interval) * price
//! ```
//!
//! Completions are compared with deadlines in absolute time, i.e. after
//! adding the ledger's origin.
//!
//! When a class wins, a fresh resource is provisioned from it and joins
//! the live fleet. Tasks with no feasible candidate are handled by the
//! configured [`InfeasiblePolicy`].

pub mod cost;

pub use cost::{ElasticCost, InfeasiblePolicy};
