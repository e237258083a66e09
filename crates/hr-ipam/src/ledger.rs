//! Address ledger
//!
//! The IP-flavored resource ledger. It shares the lifecycle contract of
//! the numeric ledger in `hr-alloc` through `hr_core::LifecycleState`;
//! the difference is how identifiers come into existence: instead of
//! committing a sequence counter, `issue` validates an explicit address
//! against its parent range and the tenant's existing assignments.

use std::collections::HashSet;
use std::sync::Arc;

use hr_core::{LifecycleStatus, UsageStatistics};
use tracing::info;
use uuid::Uuid;

use crate::addr::{is_within_range, to_address, to_integer};
use crate::assignment::AddressAssignment;
use crate::error::{IpamError, IpamResult};
use crate::range::AddressRange;
use crate::store::{AssignmentStore, RangeStore};

/// Issues and tracks IPv4 addresses for one deployment.
pub struct AddressLedger {
    ranges: Arc<dyn RangeStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl std::fmt::Debug for AddressLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressLedger").finish()
    }
}

impl AddressLedger {
    /// Create a ledger over the given stores.
    pub fn new(ranges: Arc<dyn RangeStore>, assignments: Arc<dyn AssignmentStore>) -> Self {
        Self {
            ranges,
            assignments,
        }
    }

    /// Issue a specific address from a range.
    ///
    /// The address must parse, lie inside the range's inclusive interval,
    /// and have no existing assignment record for the tenant (retired
    /// assignments keep blocking their address; they are audit rows).
    /// The new assignment starts in the available state.
    pub async fn issue(&self, range_id: Uuid, address: &str) -> IpamResult<AddressAssignment> {
        let range = self.require_range(range_id).await?;
        let canonical = to_address(to_integer(address)?);

        if !is_within_range(&canonical, &range.start, &range.end)? {
            return Err(IpamError::AddressOutOfRange {
                address: canonical,
                start: range.start.clone(),
                end: range.end.clone(),
            });
        }
        if self
            .assignments
            .find_by_address(range.tenant_id, &canonical)
            .await?
            .is_some()
        {
            return Err(IpamError::AddressTaken { address: canonical });
        }

        let assignment = AddressAssignment::new(range.tenant_id, range_id, canonical);
        self.assignments.insert(assignment.clone()).await?;

        info!(
            tenant = %range.tenant_id,
            range = %range_id,
            address = %assignment.address,
            "Issued address"
        );
        Ok(assignment)
    }

    /// Issue the numerically lowest free address in a range.
    ///
    /// Fails with [`IpamError::RangeExhausted`] when every address in the
    /// interval already has an assignment record.
    pub async fn issue_next(&self, range_id: Uuid) -> IpamResult<AddressAssignment> {
        let range = self.require_range(range_id).await?;
        let start = to_integer(&range.start)?;
        let end = to_integer(&range.end)?;

        let taken: HashSet<u32> = self
            .assignments
            .list_by_range(range_id)
            .await?
            .iter()
            .filter_map(|a| to_integer(&a.address).ok())
            .collect();

        if start <= end {
            for value in start..=end {
                if !taken.contains(&value) {
                    return self.issue(range_id, &to_address(value)).await;
                }
            }
        }
        Err(IpamError::RangeExhausted { id: range_id })
    }

    /// Assign an address to a target, moving it to in-use.
    pub async fn assign(
        &self,
        assignment_id: Uuid,
        target_kind: &str,
        target_id: Uuid,
    ) -> IpamResult<AddressAssignment> {
        let mut assignment = self.require(assignment_id).await?;
        assignment
            .lifecycle
            .assign(target_kind, target_id)
            .map_err(|_| IpamError::RecordRetired { id: assignment_id })?;
        self.assignments.update(assignment.clone()).await?;
        Ok(assignment)
    }

    /// Release an address back to the available pool.
    pub async fn release(&self, assignment_id: Uuid) -> IpamResult<AddressAssignment> {
        let mut assignment = self.require(assignment_id).await?;
        assignment
            .lifecycle
            .release()
            .map_err(|_| IpamError::RecordRetired { id: assignment_id })?;
        self.assignments.update(assignment.clone()).await?;
        Ok(assignment)
    }

    /// Permanently retire an address assignment.
    ///
    /// The address stays blocked for the tenant; retiring is how an
    /// address is reserved away from future issuance.
    pub async fn retire(
        &self,
        assignment_id: Uuid,
        reason: &str,
    ) -> IpamResult<AddressAssignment> {
        let mut assignment = self.require(assignment_id).await?;
        assignment
            .lifecycle
            .retire(reason)
            .map_err(|_| IpamError::RecordRetired { id: assignment_id })?;
        self.assignments.update(assignment.clone()).await?;

        info!(
            assignment = %assignment_id,
            address = %assignment.address,
            reason,
            "Retired address"
        );
        Ok(assignment)
    }

    /// Look up a tenant's assignment for one address.
    pub async fn find_by_address(
        &self,
        tenant_id: Uuid,
        address: &str,
    ) -> IpamResult<Option<AddressAssignment>> {
        let canonical = to_address(to_integer(address)?);
        self.assignments
            .find_by_address(tenant_id, &canonical)
            .await
    }

    /// List a range's assignments in a given lifecycle status.
    pub async fn find_by_status(
        &self,
        range_id: Uuid,
        status: LifecycleStatus,
    ) -> IpamResult<Vec<AddressAssignment>> {
        self.assignments.find_by_status(range_id, status).await
    }

    /// Usage statistics for one range.
    ///
    /// `total` is the range's address capacity, so `available` counts
    /// both issued-but-unassigned and never-issued addresses;
    /// `available + in_use + retired == total` still holds.
    pub async fn usage_statistics(&self, range_id: Uuid) -> IpamResult<UsageStatistics> {
        let range = self.require_range(range_id).await?;
        let counts = self.assignments.count_by_status(range_id).await?;
        Ok(UsageStatistics::derive(
            range.address_count,
            counts.in_use,
            counts.retired,
        ))
    }

    async fn require_range(&self, range_id: Uuid) -> IpamResult<AddressRange> {
        self.ranges
            .find(range_id)
            .await?
            .ok_or(IpamError::RangeNotFound { id: range_id })
    }

    async fn require(&self, assignment_id: Uuid) -> IpamResult<AddressAssignment> {
        self.assignments
            .find(assignment_id)
            .await?
            .ok_or(IpamError::AssignmentNotFound { id: assignment_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryAssignmentStore, MemoryRangeStore};
    use hr_core::Assignment;

    async fn ledger_with_range(start: &str, end: &str) -> (AddressLedger, Uuid, Uuid) {
        let ranges = Arc::new(MemoryRangeStore::new());
        let assignments = Arc::new(MemoryAssignmentStore::new());
        let tenant = Uuid::now_v7();
        let range = AddressRange::new(tenant, start, end, "Office").unwrap();
        let range_id = range.id;
        ranges.insert(range).await.unwrap();

        (AddressLedger::new(ranges, assignments), tenant, range_id)
    }

    #[tokio::test]
    async fn test_issue_validates_membership() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.1", "10.0.0.9").await;

        let issued = ledger.issue(range_id, "10.0.0.5").await.unwrap();
        assert_eq!(issued.address, "10.0.0.5");
        assert_eq!(issued.status(), LifecycleStatus::Available);

        let outside = ledger.issue(range_id, "10.0.0.10").await;
        assert!(matches!(outside, Err(IpamError::AddressOutOfRange { .. })));

        let malformed = ledger.issue(range_id, "10.0.0").await;
        assert!(matches!(
            malformed,
            Err(IpamError::InvalidAddressFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_issue_rejects_duplicates() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.1", "10.0.0.9").await;

        ledger.issue(range_id, "10.0.0.5").await.unwrap();
        // Same address in a non-canonical spelling still collides.
        let duplicate = ledger.issue(range_id, "10.0.0.05").await;
        assert!(matches!(duplicate, Err(IpamError::AddressTaken { .. })));
    }

    #[tokio::test]
    async fn test_issue_next_skips_taken_addresses() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.1", "10.0.0.3").await;

        ledger.issue(range_id, "10.0.0.1").await.unwrap();
        let next = ledger.issue_next(range_id).await.unwrap();
        assert_eq!(next.address, "10.0.0.2");

        ledger.issue(range_id, "10.0.0.3").await.unwrap();
        let exhausted = ledger.issue_next(range_id).await;
        assert!(matches!(exhausted, Err(IpamError::RangeExhausted { .. })));
    }

    #[tokio::test]
    async fn test_zero_capacity_range_is_exhausted() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.9", "10.0.0.1").await;

        let result = ledger.issue_next(range_id).await;
        assert!(matches!(result, Err(IpamError::RangeExhausted { .. })));
    }

    #[tokio::test]
    async fn test_lifecycle_round_trip() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.1", "10.0.0.9").await;
        let issued = ledger.issue(range_id, "10.0.0.1").await.unwrap();
        let printer = Uuid::now_v7();

        let assigned = ledger.assign(issued.id, "asset", printer).await.unwrap();
        assert_eq!(assigned.status(), LifecycleStatus::InUse);
        assert_eq!(
            assigned.target(),
            &Assignment::AssignedTo {
                kind: "asset".to_string(),
                id: printer
            }
        );

        ledger.release(issued.id).await.unwrap();
        ledger.retire(issued.id, "reserved for gateway").await.unwrap();

        assert!(matches!(
            ledger.assign(issued.id, "asset", printer).await,
            Err(IpamError::RecordRetired { .. })
        ));
    }

    #[tokio::test]
    async fn test_usage_statistics_use_range_capacity() {
        let (ledger, _tenant, range_id) = ledger_with_range("10.0.0.1", "10.0.0.10").await;

        let a = ledger.issue(range_id, "10.0.0.1").await.unwrap();
        let b = ledger.issue(range_id, "10.0.0.2").await.unwrap();
        ledger.assign(a.id, "asset", Uuid::now_v7()).await.unwrap();
        ledger.retire(b.id, "broadcast clash").await.unwrap();

        let stats = ledger.usage_statistics(range_id).await.unwrap();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.in_use, 1);
        assert_eq!(stats.retired, 1);
        assert_eq!(stats.available, 8);
        assert_eq!(stats.available + stats.in_use + stats.retired, stats.total);
    }
}
