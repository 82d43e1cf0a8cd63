//! Storage error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations.
///
/// Unique-constraint violations surface as [`StorageError::Duplicate`]
/// and referential-integrity violations as [`StorageError::ForeignKey`],
/// never as generic I/O errors, so callers can treat conflicts as
/// recoverable.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found by ID.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "issuer", "oauth client").
        entity_type: &'static str,
        /// Entity ID.
        id: Uuid,
    },

    /// Entity not found by a named key (e.g., an issuer URI).
    #[error("{entity_type} not found: '{name}'")]
    NotFoundByName {
        /// Type of entity.
        entity_type: &'static str,
        /// The key that missed.
        name: String,
    },

    /// Unique constraint violation.
    #[error("duplicate {entity_type}: {field} '{value}' already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Referential integrity violation (e.g., deleting an issuer that
    /// federation records still reference).
    #[error("operation violates referential integrity: {0}")]
    ForeignKey(String),

    /// Invalid data rejected before persistence.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    Connection(String),

    /// Database query error.
    #[error("database query error: {0}")]
    Query(String),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a not found error for an entity ID.
    #[must_use]
    pub const fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Creates a not found error for a named key.
    #[must_use]
    pub fn not_found_by_name(entity_type: &'static str, name: impl Into<String>) -> Self {
        Self::NotFoundByName {
            entity_type,
            name: name.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Whether this is a lookup miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundByName { .. })
    }

    /// Whether this is a unique-key conflict.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Whether the named entity type was the one not found.
    #[must_use]
    pub fn is_not_found_entity(&self, entity: &str) -> bool {
        match self {
            Self::NotFound { entity_type, .. } | Self::NotFoundByName { entity_type, .. } => {
                *entity_type == entity
            }
            _ => false,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
