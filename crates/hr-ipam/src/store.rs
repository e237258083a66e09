//! Address space persistence seam
//!
//! Storage abstractions for ranges and assignments plus in-memory
//! implementations, mirroring the category/record stores in `hr-alloc`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hr_core::{LedgerCounts, LifecycleStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assignment::AddressAssignment;
use crate::error::{IpamError, IpamResult};
use crate::range::AddressRange;

/// Storage abstraction for address ranges.
#[async_trait]
pub trait RangeStore: Send + Sync {
    /// Insert a new range.
    async fn insert(&self, range: AddressRange) -> IpamResult<()>;

    /// Look up a range by id.
    async fn find(&self, id: Uuid) -> IpamResult<Option<AddressRange>>;

    /// Replace an existing range (label, subnet, gateway).
    async fn update(&self, range: AddressRange) -> IpamResult<()>;

    /// List a tenant's ranges.
    async fn list_by_tenant(&self, tenant_id: Uuid) -> IpamResult<Vec<AddressRange>>;
}

/// Storage abstraction for address assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Insert a newly issued assignment.
    ///
    /// Fails with [`IpamError::AddressTaken`] if the tenant already has
    /// an assignment record for this address.
    async fn insert(&self, assignment: AddressAssignment) -> IpamResult<()>;

    /// Look up an assignment by id.
    async fn find(&self, id: Uuid) -> IpamResult<Option<AddressAssignment>>;

    /// Replace an existing assignment after a lifecycle transition.
    async fn update(&self, assignment: AddressAssignment) -> IpamResult<()>;

    /// Look up a tenant's assignment for one address.
    async fn find_by_address(
        &self,
        tenant_id: Uuid,
        address: &str,
    ) -> IpamResult<Option<AddressAssignment>>;

    /// List every assignment issued from a range.
    async fn list_by_range(&self, range_id: Uuid) -> IpamResult<Vec<AddressAssignment>>;

    /// List a range's assignments in a given lifecycle status.
    async fn find_by_status(
        &self,
        range_id: Uuid,
        status: LifecycleStatus,
    ) -> IpamResult<Vec<AddressAssignment>>;

    /// Count a range's assignments by status.
    async fn count_by_status(&self, range_id: Uuid) -> IpamResult<LedgerCounts>;
}

/// In-memory range store.
pub struct MemoryRangeStore {
    ranges: Arc<RwLock<HashMap<Uuid, AddressRange>>>,
}

impl MemoryRangeStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            ranges: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRangeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRangeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRangeStore").finish()
    }
}

#[async_trait]
impl RangeStore for MemoryRangeStore {
    async fn insert(&self, range: AddressRange) -> IpamResult<()> {
        self.ranges.write().await.insert(range.id, range);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> IpamResult<Option<AddressRange>> {
        Ok(self.ranges.read().await.get(&id).cloned())
    }

    async fn update(&self, mut range: AddressRange) -> IpamResult<()> {
        let mut ranges = self.ranges.write().await;
        if !ranges.contains_key(&range.id) {
            return Err(IpamError::RangeNotFound { id: range.id });
        }
        range.updated_at = Utc::now();
        ranges.insert(range.id, range);
        Ok(())
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> IpamResult<Vec<AddressRange>> {
        let ranges = self.ranges.read().await;
        let mut matching: Vec<AddressRange> = ranges
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.created_at);
        Ok(matching)
    }
}

/// In-memory assignment store.
pub struct MemoryAssignmentStore {
    assignments: Arc<RwLock<HashMap<Uuid, AddressAssignment>>>,
}

impl MemoryAssignmentStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            assignments: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryAssignmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAssignmentStore").finish()
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn insert(&self, assignment: AddressAssignment) -> IpamResult<()> {
        let mut assignments = self.assignments.write().await;
        let taken = assignments.values().any(|other| {
            other.tenant_id == assignment.tenant_id && other.address == assignment.address
        });
        if taken {
            return Err(IpamError::AddressTaken {
                address: assignment.address.clone(),
            });
        }
        assignments.insert(assignment.id, assignment);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> IpamResult<Option<AddressAssignment>> {
        Ok(self.assignments.read().await.get(&id).cloned())
    }

    async fn update(&self, assignment: AddressAssignment) -> IpamResult<()> {
        let mut assignments = self.assignments.write().await;
        if !assignments.contains_key(&assignment.id) {
            return Err(IpamError::AssignmentNotFound { id: assignment.id });
        }
        assignments.insert(assignment.id, assignment);
        Ok(())
    }

    async fn find_by_address(
        &self,
        tenant_id: Uuid,
        address: &str,
    ) -> IpamResult<Option<AddressAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .find(|a| a.tenant_id == tenant_id && a.address == address)
            .cloned())
    }

    async fn list_by_range(&self, range_id: Uuid) -> IpamResult<Vec<AddressAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.range_id == range_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(
        &self,
        range_id: Uuid,
        status: LifecycleStatus,
    ) -> IpamResult<Vec<AddressAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.range_id == range_id && a.status() == status)
            .cloned()
            .collect())
    }

    async fn count_by_status(&self, range_id: Uuid) -> IpamResult<LedgerCounts> {
        let assignments = self.assignments.read().await;
        let mut counts = LedgerCounts::default();
        for assignment in assignments.values().filter(|a| a.range_id == range_id) {
            counts.total += 1;
            match assignment.status() {
                LifecycleStatus::InUse => counts.in_use += 1,
                LifecycleStatus::Retired => counts.retired += 1,
                LifecycleStatus::Available => {}
            }
        }
        Ok(counts)
    }
}
