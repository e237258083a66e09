//! Error types for organization hierarchy operations
//!
//! This module defines all error types that can occur while traversing or
//! mutating the organization tree and while computing tenant scopes.

use hr_core::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Organization hierarchy error types.
#[derive(Debug, Error)]
pub enum OrgError {
    /// Referenced organization does not exist
    #[error("Organization not found: {id}")]
    NotFound { id: Uuid },

    /// Another organization already holds this short code
    #[error("Organization code already in use: {code}")]
    DuplicateCode { code: String },

    /// Reparenting would make a node its own ancestor
    #[error("Reparenting {node} under {proposed_parent} would create a cycle")]
    CycleDetected { node: Uuid, proposed_parent: Uuid },

    /// Traversal exceeded the depth guard; the persisted tree is corrupt
    #[error("Organization tree exceeds maximum depth of {limit}")]
    TreeTooDeep { limit: u32 },

    /// A reorder batch did not match the node's current children
    #[error("Reorder batch does not match the children of {parent}")]
    SiblingMismatch { parent: Uuid },
}

/// Result type for organization hierarchy operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Classify this error for caller retry behavior and alerting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrgError::DuplicateCode { .. } | OrgError::SiblingMismatch { .. } => {
                ErrorKind::Validation
            }
            OrgError::CycleDetected { .. } => ErrorKind::Conflict,
            OrgError::NotFound { .. } | OrgError::TreeTooDeep { .. } => ErrorKind::Integrity,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::NotFound { .. } => "ORG_NOT_FOUND",
            OrgError::DuplicateCode { .. } => "DUPLICATE_ORG_CODE",
            OrgError::CycleDetected { .. } => "CYCLE_DETECTED",
            OrgError::TreeTooDeep { .. } => "TREE_TOO_DEEP",
            OrgError::SiblingMismatch { .. } => "SIBLING_MISMATCH",
        }
    }
}
