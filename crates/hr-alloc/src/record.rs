//! Allocation record domain models
//!
//! One record per issued identifier. Records are never physically
//! deleted; together with the retired state they form the audit trail of
//! every identifier the platform ever handed out.

use chrono::{DateTime, Utc};
use hr_core::{Assignment, LifecycleState, LifecycleStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One issued identifier and its lifecycle.
///
/// Uniqueness of `(tenant_id, category_id, sequence)` is enforced by the
/// record store.
///
/// # Examples
///
/// ```
/// use hr_alloc::AllocationRecord;
/// use hr_core::LifecycleStatus;
/// use uuid::Uuid;
///
/// let record =
///     AllocationRecord::new(Uuid::now_v7(), Uuid::now_v7(), "ACME-EMP-0001", 1);
/// assert_eq!(record.status(), LifecycleStatus::Available);
/// assert_eq!(record.sequence, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Tenant root organization this record belongs to
    pub tenant_id: Uuid,

    /// Category that issued this identifier
    pub category_id: Uuid,

    /// The rendered identifier (e.g. `ACME-EMP-0001`)
    pub full_identifier: String,

    /// The numeric sequence value behind the identifier
    pub sequence: u64,

    /// Lifecycle status, assignment target, and audit timestamps
    #[serde(flatten)]
    pub lifecycle: LifecycleState,

    /// When the identifier was issued
    pub created_at: DateTime<Utc>,
}

impl AllocationRecord {
    /// Creates a freshly issued record in the available state.
    pub fn new(
        tenant_id: Uuid,
        category_id: Uuid,
        full_identifier: impl Into<String>,
        sequence: u64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            category_id,
            full_identifier: full_identifier.into(),
            sequence,
            lifecycle: LifecycleState::new(),
            created_at: Utc::now(),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> LifecycleStatus {
        self.lifecycle.status
    }

    /// Current assignment target.
    pub fn assignment(&self) -> &Assignment {
        &self.lifecycle.assignment
    }
}
