// ============================================================================
// spark-lookup - Errors
// ============================================================================

use thiserror::Error;

/// Errors raised by key-indexed and ordinal access on a lookup.
///
/// Every variant is a caller contract violation on an in-memory structure;
/// nothing is retried and no state changes before the error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The key has no live group.
    #[error("key not found in lookup")]
    KeyNotFound,

    /// Ordinal access outside `[0, len)`.
    #[error("index {index} out of range for lookup of {len} groups")]
    IndexOutOfRange { index: usize, len: usize },
}
