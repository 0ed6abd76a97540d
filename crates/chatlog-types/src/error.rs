use thiserror::Error;

/// Errors related to conversation operations.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Input failed validation. Carries every violated rule, not just the first.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl ConversationError {
    /// Shorthand for a validation error with a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ConversationError::Validation(vec![message.into()])
    }
}

/// Errors from repository operations (used by trait definitions in chatlog-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    /// Unique or primary-key violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// CHECK or NOT NULL rule rejected by the store.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl From<RepositoryError> for ConversationError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => ConversationError::Conflict(msg),
            RepositoryError::Constraint(msg) => ConversationError::Constraint(msg),
            other => ConversationError::StorageError(other.to_string()),
        }
    }
}

/// Errors raised while validating the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_all() {
        let err = ConversationError::Validation(vec![
            "userIdentifier is required".to_string(),
            "mediaType is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: userIdentifier is required; mediaType is required"
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_error_maps_to_conversation_error() {
        let err: ConversationError = RepositoryError::Conflict("id".to_string()).into();
        assert!(matches!(err, ConversationError::Conflict(_)));

        let err: ConversationError = RepositoryError::Constraint("media_type".to_string()).into();
        assert!(matches!(err, ConversationError::Constraint(_)));

        let err: ConversationError = RepositoryError::Connection.into();
        assert!(matches!(err, ConversationError::StorageError(_)));
    }
}
