use crate::store::StoreError;
use thiserror::Error;

/// Everything that can go wrong around a clearing run.
///
/// The solver arithmetic itself cannot fail; failures come from the
/// invocation boundary (a bad iteration cap), the result store, or the
/// record encoding. Any failure aborts the invocation — there are no
/// retries and no partial results, so a failed run leaves the previously
/// stored record untouched.
#[derive(Debug, Error)]
pub enum ClearingError {
    #[error("max iterations must be a positive integer, got '{raw}'")]
    InvalidMaxIterations { raw: String },

    #[error("no clearing result stored under key '{key}'; run a solve first")]
    NoStoredResult { key: String },

    #[error("result store failure: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode or decode clearing result: {0}")]
    Serialization(#[from] serde_json::Error),
}
