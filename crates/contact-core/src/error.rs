use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Coarse classification of a failure, used by the HTTP layer to pick a
/// response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The record does not exist, or its identifier is not well-formed.
    NotFound,
    /// The request itself could not be understood.
    BadRequest,
    /// Anything else.
    Internal,
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("contact not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Malformed identifiers are reported the same way as missing records.
    pub fn invalid_id(id: &str) -> Self {
        Self::NotFound(format!("invalid contact id '{id}'"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_is_classified_as_not_found() {
        assert_eq!(
            StorageError::NotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(StorageError::invalid_id("zzz").kind(), ErrorKind::NotFound);

        for err in [
            StorageError::Unavailable("x".into()),
            StorageError::Timeout("x".into()),
            StorageError::Query("x".into()),
            StorageError::InvalidData("x".into()),
            StorageError::Operation("x".into()),
        ] {
            assert_eq!(err.kind(), ErrorKind::Internal);
        }
    }

    #[test]
    fn invalid_id_mentions_the_id() {
        let err = StorageError::invalid_id("not-a-valid-id");
        assert!(err.to_string().contains("not-a-valid-id"));
    }
}
