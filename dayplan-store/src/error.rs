//! Structured error types for store operations.

use thiserror::Error;

/// Error type for store operations.
///
/// Not-found is its own variant so callers can distinguish the expected,
/// recoverable case from driver failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying driver operation failed
    #[error("database error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A value could not be serialized to BSON
    #[error("BSON encode error: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    /// A document could not be deserialized from BSON
    #[error("BSON decode error: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    /// No document matched a `must_` operation
    #[error("not found: {collection} {key}")]
    NotFound { collection: String, key: String },
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a not-found error for a document in a collection.
    pub fn not_found(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound { collection: collection.into(), key: key.into() }
    }

    /// True if this error is the expected not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::not_found("todos", "64f000000000000000000000");
        assert_eq!(err.to_string(), "not found: todos 64f000000000000000000000");
        assert!(err.is_not_found());
    }
}
