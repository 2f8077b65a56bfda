//! The iterative primal-dual clearing engine.

pub mod engine;

pub use engine::ClearingEngine;
