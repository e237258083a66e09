//! # IPv4 Address Range Management
//!
//! Tenant-scoped IPv4 address pools for the Atrium HR platform, used to
//! hand out addresses to tracked assets (workstations, printers, VoIP
//! phones).
//!
//! Addresses carry the same three-state lifecycle as every other issued
//! identifier on the platform (available → in-use → retired), shared via
//! `hr-core`. What differs from the numeric ledger in `hr-alloc` is
//! issuance: an address is named explicitly (or picked as the lowest free
//! value) and validated against its parent range instead of drawn from a
//! sequence counter.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hr_ipam::{AddressLedger, AddressRange, MemoryAssignmentStore, MemoryRangeStore, RangeStore};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), hr_ipam::IpamError> {
//! let ranges = Arc::new(MemoryRangeStore::new());
//! let assignments = Arc::new(MemoryAssignmentStore::new());
//! let ledger = AddressLedger::new(ranges.clone(), assignments);
//!
//! let range = AddressRange::new(Uuid::now_v7(), "10.0.0.1", "10.0.0.100", "Office")?;
//! let range_id = range.id;
//! ranges.insert(range).await?;
//!
//! let assignment = ledger.issue(range_id, "10.0.0.7").await?;
//! assert_eq!(assignment.address, "10.0.0.7");
//! # Ok(())
//! # }
//! ```

pub mod addr;
pub mod assignment;
pub mod error;
pub mod ledger;
pub mod range;
pub mod store;

// Re-export main types for convenience
pub use addr::{count_in_range, is_within_range, to_address, to_integer};
pub use assignment::AddressAssignment;
pub use error::{IpamError, IpamResult};
pub use ledger::AddressLedger;
pub use range::AddressRange;
pub use store::{AssignmentStore, MemoryAssignmentStore, MemoryRangeStore, RangeStore};
