//! # HR Platform Core Types
//!
//! Foundational types shared by the Atrium HR platform crates:
//!
//! - **Lifecycle**: the three-state allocation lifecycle
//!   (available → in-use → retired) used by both the numeric identifier
//!   ledger (`hr-alloc`) and the IP address ledger (`hr-ipam`)
//! - **Error taxonomy**: the validation / conflict / integrity
//!   classification every platform error maps into
//!
//! ## Architecture
//!
//! ```text
//! hr-core
//!   ├─ LifecycleState (status + assignment + audit timestamps)
//!   ├─ UsageStatistics
//!   └─ ErrorKind (Validation | Conflict | Integrity)
//!        ▲                ▲
//!   hr-alloc           hr-org, hr-ipam
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use hr_core::{Assignment, LifecycleState, LifecycleStatus};
//! use uuid::Uuid;
//!
//! let mut state = LifecycleState::new();
//! assert_eq!(state.status, LifecycleStatus::Available);
//!
//! state.assign("employee", Uuid::now_v7()).unwrap();
//! assert_eq!(state.status, LifecycleStatus::InUse);
//!
//! state.retire("employee offboarded").unwrap();
//! assert!(state.assign("employee", Uuid::now_v7()).is_err());
//! ```

pub mod kind;
pub mod lifecycle;

pub use kind::ErrorKind;
pub use lifecycle::{
    Assignment, LedgerCounts, LifecycleError, LifecycleState, LifecycleStatus, UsageStatistics,
};
