//! Error taxonomy shared by every layer of the record-keeper.

use thiserror::Error;

use crate::entity::EntityKind;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// `NameConflict`, `NotFound` and `InsufficientStock` are terminal business
/// outcomes: the operation was rejected and nothing was persisted. `Store` is
/// the only variant describing an infrastructure failure, and the only one a
/// caller may reasonably retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A save would violate name uniqueness for this kind of entity.
    #[error("{kind} name already exists: {name}")]
    NameConflict { kind: EntityKind, name: String },

    /// A referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: i64 },

    /// A stock reduction asked for more than is available.
    #[error(
        "insufficient stock for article {article_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        article_id: i64,
        requested: i32,
        available: i32,
    },

    /// Malformed input: lengths, category count, page size, sort field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An id string that does not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The store refused a write that would break a persisted invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The backing store failed (unavailable, corrupt row, poisoned lock...).
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn name_conflict(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NameConflict {
            kind,
            name: name.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<i64>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn insufficient_stock(article_id: impl Into<i64>, requested: i32, available: i32) -> Self {
        Self::InsufficientStock {
            article_id: article_id.into(),
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether a caller may retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }
}
