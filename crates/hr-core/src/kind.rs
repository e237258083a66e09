//! Error classification
//!
//! This module defines the three-way classification every platform error
//! falls into, which drives caller retry behavior and operator alerting.

use serde::{Deserialize, Serialize};

/// Classification of a platform error.
///
/// Every error in the platform crates maps to exactly one kind:
///
/// - **Validation**: rejected before any state change; the caller can
///   retry with corrected input
/// - **Conflict**: the operation raced or contradicts current state; the
///   caller should re-read state and decide whether to retry
/// - **Integrity**: a fatal configuration or data problem (corrupted tree,
///   missing tenant root) that should alert an operator rather than be
///   silently retried
///
/// # Examples
///
/// ```
/// use hr_core::ErrorKind;
///
/// assert!(ErrorKind::Conflict.is_retryable());
/// assert!(!ErrorKind::Integrity.is_retryable());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-bounds input, rejected before any state change
    Validation,

    /// The operation conflicts with current state or lost a race
    Conflict,

    /// Fatal configuration or data corruption requiring operator attention
    Integrity,
}

impl ErrorKind {
    /// Check whether an error of this kind may be retried by the caller.
    ///
    /// Validation errors are retryable only after correcting the input;
    /// conflict errors after re-reading state. Integrity errors must not
    /// be retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorKind::Integrity)
    }

    /// Check whether an error of this kind should be logged at error level.
    ///
    /// Validation and conflict errors are expected in normal operation and
    /// are logged at lower levels.
    pub fn is_operator_error(&self) -> bool {
        matches!(self, ErrorKind::Integrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(ErrorKind::Validation.is_retryable());
        assert!(ErrorKind::Conflict.is_retryable());
        assert!(!ErrorKind::Integrity.is_retryable());
    }

    #[test]
    fn test_operator_visibility() {
        assert!(!ErrorKind::Validation.is_operator_error());
        assert!(!ErrorKind::Conflict.is_operator_error());
        assert!(ErrorKind::Integrity.is_operator_error());
    }
}
