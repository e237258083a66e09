//! Error types for address space operations

use hr_core::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Address space error types.
#[derive(Debug, Error)]
pub enum IpamError {
    /// The string is not four numeric octets in [0, 255]
    #[error("Invalid IPv4 address format: {address:?}")]
    InvalidAddressFormat { address: String },

    /// The address falls outside the parent range's interval
    #[error("Address {address} is outside range {start}..={end}")]
    AddressOutOfRange {
        address: String,
        start: String,
        end: String,
    },

    /// The tenant already has an assignment record for this address
    #[error("Address already assigned: {address}")]
    AddressTaken { address: String },

    /// Referenced address range does not exist
    #[error("Address range not found: {id}")]
    RangeNotFound { id: Uuid },

    /// Referenced address assignment does not exist
    #[error("Address assignment not found: {id}")]
    AssignmentNotFound { id: Uuid },

    /// Every address in the range has an assignment record
    #[error("No free addresses left in range {id}")]
    RangeExhausted { id: Uuid },

    /// The assignment is retired; no lifecycle transition can leave that
    /// state
    #[error("Address assignment is retired: {id}")]
    RecordRetired { id: Uuid },
}

/// Result type for address space operations.
pub type IpamResult<T> = Result<T, IpamError>;

impl IpamError {
    /// Classify this error for caller retry behavior and alerting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IpamError::InvalidAddressFormat { .. } | IpamError::AddressOutOfRange { .. } => {
                ErrorKind::Validation
            }
            IpamError::AddressTaken { .. }
            | IpamError::RangeExhausted { .. }
            | IpamError::RecordRetired { .. } => ErrorKind::Conflict,
            IpamError::RangeNotFound { .. } | IpamError::AssignmentNotFound { .. } => {
                ErrorKind::Integrity
            }
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            IpamError::InvalidAddressFormat { .. } => "INVALID_ADDRESS_FORMAT",
            IpamError::AddressOutOfRange { .. } => "ADDRESS_OUT_OF_RANGE",
            IpamError::AddressTaken { .. } => "ADDRESS_TAKEN",
            IpamError::RangeNotFound { .. } => "RANGE_NOT_FOUND",
            IpamError::AssignmentNotFound { .. } => "ASSIGNMENT_NOT_FOUND",
            IpamError::RangeExhausted { .. } => "RANGE_EXHAUSTED",
            IpamError::RecordRetired { .. } => "RECORD_RETIRED",
        }
    }
}
