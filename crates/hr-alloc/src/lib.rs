//! # Identifier Allocation
//!
//! This crate issues collision-free, human-readable identifiers for the
//! Atrium HR platform: employee numbers, asset numbers, and any other
//! per-tenant sequence space.
//!
//! ## Overview
//!
//! - **Categories**: tenant-scoped sequence spaces with a persisted
//!   monotonic counter
//! - **SequenceCounter**: peek/commit semantics over the counter, with
//!   compare-and-swap writes and bounded contention retries
//! - **ResourceLedger**: the allocation-record store and lifecycle state
//!   machine (available → in-use → retired)
//!
//! ## Architecture
//!
//! ```text
//! ResourceLedger
//!   ├─ SequenceCounter ──→ CategoryStore (CAS on the counter)
//!   ├─ render()            (tenant code + category code + padded number)
//!   └─ RecordStore         (one row per issued identifier, never deleted)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hr_alloc::{
//!     AllocationCategory, CategoryKind, CategoryStore, MemoryCategoryStore, MemoryRecordStore,
//!     ResourceLedger,
//! };
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), hr_alloc::AllocError> {
//! let categories = Arc::new(MemoryCategoryStore::new());
//! let records = Arc::new(MemoryRecordStore::new());
//! let ledger = ResourceLedger::new(categories.clone(), records);
//!
//! let tenant = Uuid::now_v7();
//! let category =
//!     AllocationCategory::new(tenant, CategoryKind::EmployeeNumber, "EMP", "Employee numbers")?;
//! let category_id = category.id;
//! categories.insert(category).await?;
//!
//! let record = ledger.issue("ACME", category_id).await?;
//! assert_eq!(record.full_identifier, "ACME-EMP-0001");
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! - `hr-core`: the lifecycle state machine shared with `hr-ipam`
//! - `hr-org`: collaborators resolve the tenant code and scope from there

pub mod category;
pub mod error;
pub mod ledger;
pub mod record;
pub mod sequence;
pub mod store;

// Re-export main types for convenience
pub use category::{AllocationCategory, CategoryKind};
pub use error::{AllocError, AllocResult};
pub use ledger::ResourceLedger;
pub use record::AllocationRecord;
pub use sequence::{render, ContentionPolicy, IdentifierFormat, SequenceCounter};
pub use store::{CategoryStore, MemoryCategoryStore, MemoryRecordStore, RecordStore};
