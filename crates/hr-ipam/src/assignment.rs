//! Address assignment domain models

use chrono::{DateTime, Utc};
use hr_core::{Assignment, LifecycleState, LifecycleStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One issued IPv4 address and its lifecycle.
///
/// The IP-flavored counterpart of an allocation record: at most one
/// assignment exists per (tenant, address) pair, and it carries the same
/// three-state lifecycle. Assignments are never physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressAssignment {
    /// Unique identifier for the assignment
    pub id: Uuid,

    /// Tenant root organization this assignment belongs to
    pub tenant_id: Uuid,

    /// Range the address was issued from
    pub range_id: Uuid,

    /// The issued address (canonical dotted-decimal)
    pub address: String,

    /// Lifecycle status, assignment target, and audit timestamps
    #[serde(flatten)]
    pub lifecycle: LifecycleState,

    /// When the address was issued
    pub created_at: DateTime<Utc>,
}

impl AddressAssignment {
    /// Creates a freshly issued assignment in the available state.
    pub fn new(tenant_id: Uuid, range_id: Uuid, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            range_id,
            address: address.into(),
            lifecycle: LifecycleState::new(),
            created_at: Utc::now(),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> LifecycleStatus {
        self.lifecycle.status
    }

    /// Current assignment target.
    pub fn target(&self) -> &Assignment {
        &self.lifecycle.assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assignment_is_available() {
        let assignment = AddressAssignment::new(Uuid::now_v7(), Uuid::now_v7(), "10.0.0.7");
        assert_eq!(assignment.status(), LifecycleStatus::Available);
        assert_eq!(assignment.target(), &Assignment::Unassigned);
        assert_eq!(assignment.address, "10.0.0.7");
    }
}
