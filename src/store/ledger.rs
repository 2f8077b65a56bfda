use crate::core::error::ClearingError;
use crate::core::problem::{MarketProblem, MaxIterations};
use crate::core::result::ClearingResult;
use crate::solver::engine::ClearingEngine;
use crate::store::ResultStore;
use log::info;

/// The single well-known key under which the latest result lives. Each
/// successful solve overwrites it; no history is kept.
pub const LATEST_RESULT_KEY: &str = "LATEST_OPTIMIZATION_RESULT";

/// Records clearing results in a store and reads the latest one back.
///
/// The ledger owns serialization: results go in as flat JSON and come back
/// out field-for-field identical. The store backend is injected so the same
/// ledger logic runs against memory in tests and files in the CLI.
pub struct ResultLedger<S: ResultStore> {
    store: S,
}

impl<S: ResultStore> ResultLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serialize `result` and overwrite the stored record.
    pub fn record(&mut self, result: &ClearingResult) -> Result<(), ClearingError> {
        let bytes = serde_json::to_vec(result)?;
        self.store.put(LATEST_RESULT_KEY, &bytes)?;
        Ok(())
    }

    /// The most recently recorded result, or `NoStoredResult` if no solve
    /// has ever completed.
    pub fn latest(&self) -> Result<ClearingResult, ClearingError> {
        let bytes = self
            .store
            .get(LATEST_RESULT_KEY)?
            .ok_or_else(|| ClearingError::NoStoredResult {
                key: LATEST_RESULT_KEY.to_string(),
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Seed the store with an all-zero placeholder so that queries made
    /// before the first solve have something to return. Idempotent: an
    /// existing record, placeholder or real, is left alone.
    ///
    /// Returns `true` when the placeholder was written.
    pub fn init(&mut self) -> Result<bool, ClearingError> {
        if self.store.get(LATEST_RESULT_KEY)?.is_some() {
            info!("ledger already initialized under '{}'", LATEST_RESULT_KEY);
            return Ok(false);
        }
        self.record(&ClearingResult::placeholder())?;
        info!("ledger seeded with placeholder under '{}'", LATEST_RESULT_KEY);
        Ok(true)
    }

    /// The invocation trigger: parse the raw iteration cap, run the solve,
    /// record the result, and hand it back.
    ///
    /// A parse failure aborts before any computation; a store or
    /// serialization failure aborts after the solve but leaves the
    /// previously recorded result in place. Nothing is retried.
    pub fn solve_and_record(
        &mut self,
        problem: &MarketProblem,
        raw_max_iterations: &str,
    ) -> Result<ClearingResult, ClearingError> {
        let cap: MaxIterations = raw_max_iterations.parse()?;
        let result = ClearingEngine::solve(problem, cap);
        self.record(&result)?;
        Ok(result)
    }
}
