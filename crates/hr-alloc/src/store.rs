//! Allocation persistence seam
//!
//! Storage abstractions for categories and records plus in-memory
//! implementations. The category store exposes the compare-and-swap
//! primitive the sequence counter is built on: a database-backed store
//! maps it to `UPDATE allocation_categories SET sequence = :next WHERE id
//! = :id AND sequence = :expected`, the in-memory store serializes it
//! under a write lock. Either way two concurrent commits can never
//! observe the same resulting value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hr_core::{LedgerCounts, LifecycleStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::category::AllocationCategory;
use crate::error::{AllocError, AllocResult};
use crate::record::AllocationRecord;

/// Storage abstraction for allocation categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a new category.
    ///
    /// Fails with [`AllocError::DuplicateCategoryCode`] if the tenant
    /// already has a category with this (kind, code) pair.
    async fn insert(&self, category: AllocationCategory) -> AllocResult<()>;

    /// Look up a category by id.
    async fn find(&self, id: Uuid) -> AllocResult<Option<AllocationCategory>>;

    /// Replace an existing category (name, active flag). The sequence
    /// field is only advanced through
    /// [`compare_and_swap_sequence`](Self::compare_and_swap_sequence).
    async fn update(&self, category: AllocationCategory) -> AllocResult<()>;

    /// Atomically advance the counter from `expected` to `next`.
    ///
    /// Returns `false` without changing anything if the stored value no
    /// longer equals `expected` (another worker won the race).
    async fn compare_and_swap_sequence(
        &self,
        id: Uuid,
        expected: u64,
        next: u64,
    ) -> AllocResult<bool>;

    /// Physically remove a category. Callers must first verify no records
    /// reference it.
    async fn remove(&self, id: Uuid) -> AllocResult<()>;
}

/// Storage abstraction for allocation records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a newly issued record.
    ///
    /// Fails with [`AllocError::SequenceCollision`] if the (tenant,
    /// category, sequence) triple already exists.
    async fn insert(&self, record: AllocationRecord) -> AllocResult<()>;

    /// Look up a record by id.
    async fn find(&self, id: Uuid) -> AllocResult<Option<AllocationRecord>>;

    /// Replace an existing record after a lifecycle transition.
    async fn update(&self, record: AllocationRecord) -> AllocResult<()>;

    /// Look up a record by its rendered identifier within a tenant.
    async fn find_by_full_identifier(
        &self,
        tenant_id: Uuid,
        full_identifier: &str,
    ) -> AllocResult<Option<AllocationRecord>>;

    /// List records of a category in a given lifecycle status.
    async fn find_by_status(
        &self,
        category_id: Uuid,
        status: LifecycleStatus,
    ) -> AllocResult<Vec<AllocationRecord>>;

    /// Count a category's records by status.
    async fn count_by_status(&self, category_id: Uuid) -> AllocResult<LedgerCounts>;
}

/// In-memory category store.
pub struct MemoryCategoryStore {
    categories: Arc<RwLock<HashMap<Uuid, AllocationCategory>>>,
}

impl MemoryCategoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryCategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCategoryStore").finish()
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn insert(&self, category: AllocationCategory) -> AllocResult<()> {
        let mut categories = self.categories.write().await;
        let duplicate = categories.values().any(|other| {
            other.id != category.id
                && other.tenant_id == category.tenant_id
                && other.kind == category.kind
                && other.code == category.code
        });
        if duplicate {
            return Err(AllocError::DuplicateCategoryCode {
                code: category.code.clone(),
            });
        }
        categories.insert(category.id, category);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AllocResult<Option<AllocationCategory>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn update(&self, mut category: AllocationCategory) -> AllocResult<()> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(AllocError::CategoryNotFound { id: category.id });
        }
        category.updated_at = Utc::now();
        categories.insert(category.id, category);
        Ok(())
    }

    async fn compare_and_swap_sequence(
        &self,
        id: Uuid,
        expected: u64,
        next: u64,
    ) -> AllocResult<bool> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .ok_or(AllocError::CategoryNotFound { id })?;
        if category.sequence != expected {
            return Ok(false);
        }
        category.sequence = next;
        category.updated_at = Utc::now();
        Ok(true)
    }

    async fn remove(&self, id: Uuid) -> AllocResult<()> {
        let mut categories = self.categories.write().await;
        categories
            .remove(&id)
            .map(|_| ())
            .ok_or(AllocError::CategoryNotFound { id })
    }
}

/// In-memory record store.
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<Uuid, AllocationRecord>>>,
}

impl MemoryRecordStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRecordStore").finish()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: AllocationRecord) -> AllocResult<()> {
        let mut records = self.records.write().await;
        let collision = records.values().any(|other| {
            other.tenant_id == record.tenant_id
                && other.category_id == record.category_id
                && other.sequence == record.sequence
        });
        if collision {
            return Err(AllocError::SequenceCollision {
                category_id: record.category_id,
                sequence: record.sequence,
            });
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AllocResult<Option<AllocationRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, record: AllocationRecord) -> AllocResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(AllocError::RecordNotFound { id: record.id });
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn find_by_full_identifier(
        &self,
        tenant_id: Uuid,
        full_identifier: &str,
    ) -> AllocResult<Option<AllocationRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.tenant_id == tenant_id && r.full_identifier == full_identifier)
            .cloned())
    }

    async fn find_by_status(
        &self,
        category_id: Uuid,
        status: LifecycleStatus,
    ) -> AllocResult<Vec<AllocationRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<AllocationRecord> = records
            .values()
            .filter(|r| r.category_id == category_id && r.status() == status)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.sequence);
        Ok(matching)
    }

    async fn count_by_status(&self, category_id: Uuid) -> AllocResult<LedgerCounts> {
        let records = self.records.read().await;
        let mut counts = LedgerCounts::default();
        for record in records.values().filter(|r| r.category_id == category_id) {
            counts.total += 1;
            match record.status() {
                LifecycleStatus::InUse => counts.in_use += 1,
                LifecycleStatus::Retired => counts.retired += 1,
                LifecycleStatus::Available => {}
            }
        }
        Ok(counts)
    }
}
