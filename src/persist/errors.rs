//! # Persistence Errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for persistence operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors
///
/// An invalid document is not an error: `Store::save` reports it by
/// returning `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record type {0} is embedded and cannot be stored on its own")]
    NotPersistable(String),

    #[error("Store for {expected} cannot hold a {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_errors_pass_through() {
        let err: StoreError = SchemaError::unknown_field("User", "nickname").into();
        assert_eq!(err.to_string(), "User has no field named 'nickname'");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            StoreError::InvalidId("xyz".into()).to_string(),
            "Invalid document id: xyz"
        );
        assert_eq!(
            StoreError::NotPersistable("Address".into()).to_string(),
            "Record type Address is embedded and cannot be stored on its own"
        );
    }
}
