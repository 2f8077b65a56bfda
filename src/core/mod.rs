//! Foundational types: market dimensions, problem constants, the result
//! record, and the error taxonomy.

pub mod dimensions;
pub mod error;
pub mod problem;
pub mod result;
