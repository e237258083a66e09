//! End-to-end allocation flow tests
//!
//! Exercises the ledger the way the employee and asset domains use it:
//! concurrent issuance against one category, and the full lifecycle of an
//! issued identifier.

use std::sync::Arc;
use std::time::Duration;

use hr_alloc::{
    AllocationCategory, CategoryKind, CategoryStore, ContentionPolicy, MemoryCategoryStore,
    MemoryRecordStore, ResourceLedger, SequenceCounter,
};
use hr_core::LifecycleStatus;
use uuid::Uuid;

async fn seeded_category(
    categories: &Arc<MemoryCategoryStore>,
    kind: CategoryKind,
    code: &str,
) -> (Uuid, Uuid) {
    let tenant = Uuid::now_v7();
    let category = AllocationCategory::new(tenant, kind, code, "test category").unwrap();
    let id = category.id;
    categories.insert(category).await.unwrap();
    (tenant, id)
}

/// Concurrent commits against one category return exactly {1, ..., N}:
/// no duplicates, no gaps.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commits_are_dense_and_unique() {
    const WORKERS: usize = 32;

    let categories = Arc::new(MemoryCategoryStore::new());
    let (_tenant, category_id) =
        seeded_category(&categories, CategoryKind::EmployeeNumber, "EMP").await;

    // Generous budget: with N workers racing, a single commit can lose
    // up to N-1 times before it wins.
    let policy = ContentionPolicy {
        max_attempts: 128,
        initial_delay: Duration::from_micros(50),
        max_delay: Duration::from_millis(2),
        exponential_base: 2.0,
    };
    let counter = Arc::new(SequenceCounter::with_policy(categories.clone(), policy));

    let mut handles = Vec::new();
    for _ in 0..WORKERS {
        let counter = counter.clone();
        handles.push(tokio::spawn(
            async move { counter.commit_next(category_id).await },
        ));
    }

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap().unwrap());
    }
    values.sort_unstable();

    let expected: Vec<u64> = (1..=WORKERS as u64).collect();
    assert_eq!(values, expected);
}

/// Issue → assign → release → retire, with statistics holding their
/// partition invariant at every step.
#[tokio::test]
async fn lifecycle_flow_keeps_statistics_consistent() {
    let categories = Arc::new(MemoryCategoryStore::new());
    let records = Arc::new(MemoryRecordStore::new());
    let (tenant, category_id) =
        seeded_category(&categories, CategoryKind::AssetNumber, "AST").await;
    let ledger = ResourceLedger::new(categories, records);

    let laptop_tag = ledger.issue("ACME", category_id).await.unwrap();
    let monitor_tag = ledger.issue("ACME", category_id).await.unwrap();
    assert_eq!(laptop_tag.full_identifier, "ACME-AST-0001");
    assert_eq!(monitor_tag.full_identifier, "ACME-AST-0002");

    let laptop = Uuid::now_v7();
    ledger.assign(laptop_tag.id, "asset", laptop).await.unwrap();

    let stats = ledger.usage_statistics(category_id).await.unwrap();
    assert_eq!((stats.total, stats.in_use, stats.available), (2, 1, 1));

    ledger.release(laptop_tag.id).await.unwrap();
    ledger.retire(monitor_tag.id, "screen cracked").await.unwrap();

    let stats = ledger.usage_statistics(category_id).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.retired, 1);
    assert_eq!(stats.available + stats.in_use + stats.retired, stats.total);

    // The retired tag stays findable for auditing.
    let audited = ledger
        .find_by_full_identifier(tenant, "ACME-AST-0002")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(audited.status(), LifecycleStatus::Retired);
    assert_eq!(audited.lifecycle.retired_reason.as_deref(), Some("screen cracked"));
}

/// Sequences keep counting upward after records retire; retired numbers
/// are never reused.
#[tokio::test]
async fn retired_sequences_are_never_reissued() {
    let categories = Arc::new(MemoryCategoryStore::new());
    let records = Arc::new(MemoryRecordStore::new());
    let (_tenant, category_id) =
        seeded_category(&categories, CategoryKind::EmployeeNumber, "EMP").await;
    let ledger = ResourceLedger::new(categories, records);

    let first = ledger.issue("ACME", category_id).await.unwrap();
    ledger.retire(first.id, "duplicate hire entry").await.unwrap();

    let second = ledger.issue("ACME", category_id).await.unwrap();
    assert_eq!(second.sequence, 2);
    assert_eq!(second.full_identifier, "ACME-EMP-0002");
}
