//! Engine error types.

use tally_calendar::StoreError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort a reconciliation pass.
///
/// Configuration problems never appear here — they are rejected at startup
/// before the engine is constructed. What remains is the remote store.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A store query, delete, or insert failed.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_and_displays() {
        let err: EngineError = StoreError::Api {
            status: 500,
            message: "backend error".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "store operation failed: API error (500): backend error"
        );
    }
}
