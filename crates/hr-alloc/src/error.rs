//! Error types for identifier allocation
//!
//! This module defines all error types that can occur while issuing,
//! rendering, or transitioning allocated identifiers.

use hr_core::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Identifier allocation error types.
#[derive(Debug, Error)]
pub enum AllocError {
    /// Referenced allocation category does not exist
    #[error("Allocation category not found: {id}")]
    CategoryNotFound { id: Uuid },

    /// Referenced allocation record does not exist
    #[error("Allocation record not found: {id}")]
    RecordNotFound { id: Uuid },

    /// The category is deactivated and cannot issue identifiers
    #[error("Allocation category is inactive: {id}")]
    CategoryInactive { id: Uuid },

    /// Sequence values start at 1; zero cannot be rendered
    #[error("Invalid sequence value: {sequence}")]
    InvalidSequence { sequence: u64 },

    /// Category codes are 2-6 alphanumeric characters
    #[error("Invalid category code: {code:?}")]
    InvalidCategoryCode { code: String },

    /// Another category in this tenant already uses this (kind, code) pair
    #[error("Duplicate category code: {code}")]
    DuplicateCategoryCode { code: String },

    /// Two records with the same (tenant, category, sequence) were issued;
    /// indicates a broken store-level counter
    #[error("Sequence {sequence} already issued for category {category_id}")]
    SequenceCollision { category_id: Uuid, sequence: u64 },

    /// The per-category counter could not be advanced within the retry
    /// budget
    #[error("Sequence allocation contention after {attempts} attempts")]
    AllocationContention { attempts: u32 },

    /// The record is retired; no lifecycle transition can leave that state
    #[error("Allocation record is retired: {id}")]
    RecordRetired { id: Uuid },

    /// The category still has issued records and cannot be removed
    #[error("Allocation category still referenced by records: {id}")]
    CategoryInUse { id: Uuid },
}

/// Result type for identifier allocation operations.
pub type AllocResult<T> = Result<T, AllocError>;

impl AllocError {
    /// Classify this error for caller retry behavior and alerting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocError::InvalidSequence { .. }
            | AllocError::InvalidCategoryCode { .. }
            | AllocError::DuplicateCategoryCode { .. } => ErrorKind::Validation,

            AllocError::CategoryInactive { .. }
            | AllocError::AllocationContention { .. }
            | AllocError::RecordRetired { .. }
            | AllocError::CategoryInUse { .. } => ErrorKind::Conflict,

            AllocError::CategoryNotFound { .. }
            | AllocError::RecordNotFound { .. }
            | AllocError::SequenceCollision { .. } => ErrorKind::Integrity,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AllocError::CategoryNotFound { .. } => "CATEGORY_NOT_FOUND",
            AllocError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            AllocError::CategoryInactive { .. } => "CATEGORY_INACTIVE",
            AllocError::InvalidSequence { .. } => "INVALID_SEQUENCE",
            AllocError::InvalidCategoryCode { .. } => "INVALID_CATEGORY_CODE",
            AllocError::DuplicateCategoryCode { .. } => "DUPLICATE_CATEGORY_CODE",
            AllocError::SequenceCollision { .. } => "SEQUENCE_COLLISION",
            AllocError::AllocationContention { .. } => "ALLOCATION_CONTENTION",
            AllocError::RecordRetired { .. } => "RECORD_RETIRED",
            AllocError::CategoryInUse { .. } => "CATEGORY_IN_USE",
        }
    }
}
