//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Only strict construction can fail; queries never do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node id {id} at positions {first} and {second}")]
    DuplicateId {
        id: NodeId,
        first: usize,
        second: usize,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
