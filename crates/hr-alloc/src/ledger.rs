//! Resource ledger
//!
//! The allocation-record store and lifecycle state machine behind every
//! numeric identifier the platform issues. `issue` is the only
//! state-creating operation: it commits the category's next sequence
//! value, renders the identifier, and persists a fresh record in the
//! available state. Everything else mutates an existing record through
//! the shared lifecycle contract or reads without side effects.

use std::sync::Arc;

use hr_core::{LifecycleStatus, UsageStatistics};
use tracing::info;
use uuid::Uuid;

use crate::error::{AllocError, AllocResult};
use crate::record::AllocationRecord;
use crate::sequence::{render, ContentionPolicy, IdentifierFormat, SequenceCounter};
use crate::store::{CategoryStore, RecordStore};

/// Issues and tracks numeric identifiers for one deployment.
///
/// The ledger is cheap to clone-by-construction: it holds shared handles
/// to the category and record stores.
pub struct ResourceLedger {
    categories: Arc<dyn CategoryStore>,
    records: Arc<dyn RecordStore>,
    counter: SequenceCounter,
    format: IdentifierFormat,
}

impl std::fmt::Debug for ResourceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLedger")
            .field("format", &self.format)
            .finish()
    }
}

impl ResourceLedger {
    /// Create a ledger with default identifier format and contention
    /// policy.
    pub fn new(categories: Arc<dyn CategoryStore>, records: Arc<dyn RecordStore>) -> Self {
        let counter = SequenceCounter::new(categories.clone());
        Self {
            categories,
            records,
            counter,
            format: IdentifierFormat::default(),
        }
    }

    /// Override the identifier format.
    pub fn with_format(mut self, format: IdentifierFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the contention policy of the underlying counter.
    pub fn with_policy(mut self, policy: ContentionPolicy) -> Self {
        self.counter = SequenceCounter::with_policy(self.categories.clone(), policy);
        self
    }

    /// Issue the next identifier from a category.
    ///
    /// Commits the next sequence value, renders
    /// `<tenant_code>-<category code>-<number>`, and persists a new
    /// record in the available state. The caller supplies the tenant
    /// code from its own company record.
    pub async fn issue(
        &self,
        tenant_code: &str,
        category_id: Uuid,
    ) -> AllocResult<AllocationRecord> {
        let category = self
            .categories
            .find(category_id)
            .await?
            .ok_or(AllocError::CategoryNotFound { id: category_id })?;

        let sequence = self.counter.commit_next(category_id).await?;
        let full_identifier = render(tenant_code, &category, sequence, &self.format)?;
        let record =
            AllocationRecord::new(category.tenant_id, category_id, full_identifier, sequence);
        self.records.insert(record.clone()).await?;

        info!(
            tenant = %category.tenant_id,
            category = %category_id,
            identifier = %record.full_identifier,
            "Issued identifier"
        );
        Ok(record)
    }

    /// Assign a record to a target, moving it to in-use.
    pub async fn assign(
        &self,
        record_id: Uuid,
        target_kind: &str,
        target_id: Uuid,
    ) -> AllocResult<AllocationRecord> {
        let mut record = self.require(record_id).await?;
        record
            .lifecycle
            .assign(target_kind, target_id)
            .map_err(|_| AllocError::RecordRetired { id: record_id })?;
        self.records.update(record.clone()).await?;
        Ok(record)
    }

    /// Release a record back to the available pool.
    pub async fn release(&self, record_id: Uuid) -> AllocResult<AllocationRecord> {
        let mut record = self.require(record_id).await?;
        record
            .lifecycle
            .release()
            .map_err(|_| AllocError::RecordRetired { id: record_id })?;
        self.records.update(record.clone()).await?;
        Ok(record)
    }

    /// Permanently retire a record.
    ///
    /// Terminal: every later transition on the record fails with
    /// [`AllocError::RecordRetired`].
    pub async fn retire(&self, record_id: Uuid, reason: &str) -> AllocResult<AllocationRecord> {
        let mut record = self.require(record_id).await?;
        record
            .lifecycle
            .retire(reason)
            .map_err(|_| AllocError::RecordRetired { id: record_id })?;
        self.records.update(record.clone()).await?;

        info!(
            record = %record_id,
            identifier = %record.full_identifier,
            reason,
            "Retired identifier"
        );
        Ok(record)
    }

    /// Look up a record by its rendered identifier within a tenant.
    pub async fn find_by_full_identifier(
        &self,
        tenant_id: Uuid,
        full_identifier: &str,
    ) -> AllocResult<Option<AllocationRecord>> {
        self.records
            .find_by_full_identifier(tenant_id, full_identifier)
            .await
    }

    /// List a category's records in a given lifecycle status.
    pub async fn find_by_status(
        &self,
        category_id: Uuid,
        status: LifecycleStatus,
    ) -> AllocResult<Vec<AllocationRecord>> {
        self.records.find_by_status(category_id, status).await
    }

    /// Usage statistics for one category.
    ///
    /// `available + in_use + retired == total` holds for every reachable
    /// ledger state.
    pub async fn usage_statistics(&self, category_id: Uuid) -> AllocResult<UsageStatistics> {
        self.categories
            .find(category_id)
            .await?
            .ok_or(AllocError::CategoryNotFound { id: category_id })?;
        let counts = self.records.count_by_status(category_id).await?;
        Ok(UsageStatistics::derive(
            counts.total,
            counts.in_use,
            counts.retired,
        ))
    }

    /// Remove a category that has never issued a record.
    ///
    /// Categories with issued records are part of the audit trail and
    /// cannot be removed; deactivate them instead.
    pub async fn remove_category(&self, category_id: Uuid) -> AllocResult<()> {
        let counts = self.records.count_by_status(category_id).await?;
        if counts.total > 0 {
            return Err(AllocError::CategoryInUse { id: category_id });
        }
        self.categories.remove(category_id).await
    }

    async fn require(&self, record_id: Uuid) -> AllocResult<AllocationRecord> {
        self.records
            .find(record_id)
            .await?
            .ok_or(AllocError::RecordNotFound { id: record_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{AllocationCategory, CategoryKind};
    use crate::store::{MemoryCategoryStore, MemoryRecordStore};
    use hr_core::Assignment;

    async fn ledger_with_category() -> (ResourceLedger, Uuid, Uuid) {
        let categories = Arc::new(MemoryCategoryStore::new());
        let records = Arc::new(MemoryRecordStore::new());
        let tenant = Uuid::now_v7();
        let category =
            AllocationCategory::new(tenant, CategoryKind::EmployeeNumber, "EMP", "Employees")
                .unwrap();
        let category_id = category.id;
        categories.insert(category).await.unwrap();

        (
            ResourceLedger::new(categories, records),
            tenant,
            category_id,
        )
    }

    #[tokio::test]
    async fn test_issue_renders_and_persists() {
        let (ledger, tenant, category_id) = ledger_with_category().await;

        let first = ledger.issue("ACME", category_id).await.unwrap();
        assert_eq!(first.full_identifier, "ACME-EMP-0001");
        assert_eq!(first.sequence, 1);
        assert_eq!(first.status(), LifecycleStatus::Available);

        let second = ledger.issue("ACME", category_id).await.unwrap();
        assert_eq!(second.full_identifier, "ACME-EMP-0002");

        let found = ledger
            .find_by_full_identifier(tenant, "ACME-EMP-0002")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, second.id);
    }

    #[tokio::test]
    async fn test_assign_release_round_trip() {
        let (ledger, _tenant, category_id) = ledger_with_category().await;
        let record = ledger.issue("ACME", category_id).await.unwrap();
        let employee = Uuid::now_v7();

        let assigned = ledger.assign(record.id, "employee", employee).await.unwrap();
        assert_eq!(assigned.status(), LifecycleStatus::InUse);
        assert_eq!(
            assigned.assignment(),
            &Assignment::AssignedTo {
                kind: "employee".to_string(),
                id: employee
            }
        );

        let released = ledger.release(record.id).await.unwrap();
        assert_eq!(released.status(), LifecycleStatus::Available);
        assert_eq!(released.assignment(), &Assignment::Unassigned);
    }

    #[tokio::test]
    async fn test_retired_is_terminal() {
        let (ledger, _tenant, category_id) = ledger_with_category().await;
        let record = ledger.issue("ACME", category_id).await.unwrap();

        ledger.retire(record.id, "issued in error").await.unwrap();

        assert!(matches!(
            ledger.assign(record.id, "employee", Uuid::now_v7()).await,
            Err(AllocError::RecordRetired { .. })
        ));
        assert!(matches!(
            ledger.release(record.id).await,
            Err(AllocError::RecordRetired { .. })
        ));
        assert!(matches!(
            ledger.retire(record.id, "again").await,
            Err(AllocError::RecordRetired { .. })
        ));
    }

    #[tokio::test]
    async fn test_usage_statistics_partition() {
        let (ledger, _tenant, category_id) = ledger_with_category().await;

        let a = ledger.issue("ACME", category_id).await.unwrap();
        let b = ledger.issue("ACME", category_id).await.unwrap();
        let _c = ledger.issue("ACME", category_id).await.unwrap();

        ledger.assign(a.id, "employee", Uuid::now_v7()).await.unwrap();
        ledger.retire(b.id, "damaged").await.unwrap();

        let stats = ledger.usage_statistics(category_id).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_use, 1);
        assert_eq!(stats.retired, 1);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.available + stats.in_use + stats.retired, stats.total);
    }

    #[tokio::test]
    async fn test_category_removal_guard() {
        let (ledger, _tenant, category_id) = ledger_with_category().await;
        ledger.issue("ACME", category_id).await.unwrap();

        assert!(matches!(
            ledger.remove_category(category_id).await,
            Err(AllocError::CategoryInUse { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let (ledger, _tenant, category_id) = ledger_with_category().await;
        let a = ledger.issue("ACME", category_id).await.unwrap();
        let b = ledger.issue("ACME", category_id).await.unwrap();
        ledger.assign(b.id, "asset", Uuid::now_v7()).await.unwrap();

        let available = ledger
            .find_by_status(category_id, LifecycleStatus::Available)
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, a.id);
    }
}
