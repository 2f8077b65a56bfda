//! # gridclear
//!
//! Iterative primal-dual market-clearing engine for a fixed electricity market.
//!
//! Three producers with quadratic cost curves face six consumers with
//! quadratic utility curves. The engine runs projected subgradient updates on
//! each producer's shadow price and each consumer's demand-bound multipliers
//! until the watched price component stops moving, then reports the cleared
//! production levels, consumption allocations, prices, and net welfare.
//!
//! ## Architecture
//!
//! - **core** — Problem constants, fixed-dimension vectors, result record, errors
//! - **solver** — The projected-subgradient clearing engine
//! - **store** — Key-value result persistence and the result ledger

pub mod core;
pub mod solver;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::dimensions::{Allocation, PerConsumer, PerProducer};
    pub use crate::core::error::ClearingError;
    pub use crate::core::problem::{MarketProblem, MaxIterations};
    pub use crate::core::result::ClearingResult;
    pub use crate::solver::engine::ClearingEngine;
    pub use crate::store::ledger::{ResultLedger, LATEST_RESULT_KEY};
    pub use crate::store::{FileStore, MemoryStore, ResultStore};
}
