//! Allocation lifecycle state machine
//!
//! This module implements the three-state lifecycle shared by every issued
//! identifier on the platform, whether it is an employee number, an asset
//! number, or an IP address:
//!
//! ```text
//!              assign                retire
//! available ───────────→ in-use ───────────→ retired (terminal)
//!     ▲                    │                    ▲
//!     └────── release ─────┘                    │
//!     └──────────────── retire ─────────────────┘
//! ```
//!
//! Retired is terminal: no operation leaves that state. Records are never
//! physically deleted, so the lifecycle doubles as the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle status of an issued identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// Issued but not assigned to anything
    Available,

    /// Assigned to a target record
    InUse,

    /// Permanently withdrawn from circulation (terminal)
    Retired,
}

/// What an issued identifier is assigned to.
///
/// Modeled as a tagged variant rather than a pair of nullable fields so
/// that a target without in-use status is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Assignment {
    /// Not assigned to any record
    Unassigned,

    /// Assigned to a specific record in a collaborating domain
    AssignedTo {
        /// Kind of the target record (e.g. `employee`, `asset`)
        kind: String,
        /// Foreign id of the target record
        id: Uuid,
    },
}

/// Lifecycle transition errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The record is retired; no further transitions are possible
    #[error("Record is retired and cannot transition")]
    Retired,
}

/// The mutable lifecycle portion of an allocation record.
///
/// Embedded in both `AllocationRecord` (hr-alloc) and `AddressAssignment`
/// (hr-ipam) so the two ledgers share one transition contract.
///
/// # Examples
///
/// ```
/// use hr_core::{Assignment, LifecycleState, LifecycleStatus};
/// use uuid::Uuid;
///
/// let mut state = LifecycleState::new();
/// let target = Uuid::now_v7();
///
/// state.assign("asset", target).unwrap();
/// assert_eq!(state.status, LifecycleStatus::InUse);
/// assert_eq!(
///     state.assignment,
///     Assignment::AssignedTo { kind: "asset".to_string(), id: target }
/// );
///
/// state.release().unwrap();
/// assert_eq!(state.status, LifecycleStatus::Available);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LifecycleState {
    /// Current status
    pub status: LifecycleStatus,

    /// Current assignment target
    pub assignment: Assignment,

    /// When the identifier was last assigned
    pub assigned_at: Option<DateTime<Utc>>,

    /// When the identifier was retired
    pub retired_at: Option<DateTime<Utc>>,

    /// Why the identifier was retired
    pub retired_reason: Option<String>,
}

impl LifecycleState {
    /// Creates a fresh lifecycle in the available state.
    pub fn new() -> Self {
        Self {
            status: LifecycleStatus::Available,
            assignment: Assignment::Unassigned,
            assigned_at: None,
            retired_at: None,
            retired_reason: None,
        }
    }

    /// Check whether the lifecycle has reached its terminal state.
    pub fn is_retired(&self) -> bool {
        self.status == LifecycleStatus::Retired
    }

    /// Assign the identifier to a target record.
    ///
    /// Moves the lifecycle to in-use and stamps `assigned_at`. Assigning
    /// an identifier that is already in use replaces the target.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Retired`] if the lifecycle is terminal.
    pub fn assign(&mut self, kind: impl Into<String>, id: Uuid) -> Result<(), LifecycleError> {
        if self.is_retired() {
            return Err(LifecycleError::Retired);
        }
        self.status = LifecycleStatus::InUse;
        self.assignment = Assignment::AssignedTo {
            kind: kind.into(),
            id,
        };
        self.assigned_at = Some(Utc::now());
        Ok(())
    }

    /// Release the identifier back to the available pool.
    ///
    /// Clears the assignment target and `assigned_at`. Releasing an
    /// already-available identifier is a no-op.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Retired`] if the lifecycle is terminal.
    pub fn release(&mut self) -> Result<(), LifecycleError> {
        if self.is_retired() {
            return Err(LifecycleError::Retired);
        }
        self.status = LifecycleStatus::Available;
        self.assignment = Assignment::Unassigned;
        self.assigned_at = None;
        Ok(())
    }

    /// Retire the identifier permanently.
    ///
    /// Allowed from both available and in-use. The assignment target is
    /// cleared and `retired_at` plus the reason are recorded.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Retired`] if the lifecycle is already terminal.
    pub fn retire(&mut self, reason: impl Into<String>) -> Result<(), LifecycleError> {
        if self.is_retired() {
            return Err(LifecycleError::Retired);
        }
        self.status = LifecycleStatus::Retired;
        self.assignment = Assignment::Unassigned;
        self.assigned_at = None;
        self.retired_at = Some(Utc::now());
        self.retired_reason = Some(reason.into());
        Ok(())
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw lifecycle status counts, as reported by a ledger store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    /// Total records the store holds for the category or range
    pub total: u64,

    /// Records currently in use
    pub in_use: u64,

    /// Records permanently retired
    pub retired: u64,
}

/// Usage statistics for one allocation category or address range.
///
/// Invariant: `available + in_use + retired == total` for every reachable
/// ledger state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UsageStatistics {
    /// Total capacity (record count for categories, address count for ranges)
    pub total: u64,

    /// Identifiers not in use and not retired
    pub available: u64,

    /// Identifiers currently assigned
    pub in_use: u64,

    /// Identifiers permanently withdrawn
    pub retired: u64,
}

impl UsageStatistics {
    /// Derive statistics from a total capacity and the in-use / retired
    /// counts, clamping `available` at zero.
    pub fn derive(total: u64, in_use: u64, retired: u64) -> Self {
        Self {
            total,
            available: total.saturating_sub(in_use.saturating_add(retired)),
            in_use,
            retired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_available() {
        let state = LifecycleState::new();
        assert_eq!(state.status, LifecycleStatus::Available);
        assert_eq!(state.assignment, Assignment::Unassigned);
        assert!(state.assigned_at.is_none());
        assert!(state.retired_at.is_none());
    }

    #[test]
    fn test_assign_release_cycle() {
        let mut state = LifecycleState::new();
        let target = Uuid::now_v7();

        state.assign("employee", target).unwrap();
        assert_eq!(state.status, LifecycleStatus::InUse);
        assert!(state.assigned_at.is_some());

        state.release().unwrap();
        assert_eq!(state.status, LifecycleStatus::Available);
        assert_eq!(state.assignment, Assignment::Unassigned);
        assert!(state.assigned_at.is_none());
    }

    #[test]
    fn test_reassign_replaces_target() {
        let mut state = LifecycleState::new();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        state.assign("employee", first).unwrap();
        state.assign("employee", second).unwrap();

        assert_eq!(
            state.assignment,
            Assignment::AssignedTo {
                kind: "employee".to_string(),
                id: second
            }
        );
    }

    #[test]
    fn test_retire_from_in_use_clears_target() {
        let mut state = LifecycleState::new();
        state.assign("asset", Uuid::now_v7()).unwrap();

        state.retire("decommissioned").unwrap();
        assert_eq!(state.status, LifecycleStatus::Retired);
        assert_eq!(state.assignment, Assignment::Unassigned);
        assert!(state.retired_at.is_some());
        assert_eq!(state.retired_reason.as_deref(), Some("decommissioned"));
    }

    #[test]
    fn test_retired_is_terminal() {
        let mut state = LifecycleState::new();
        state.retire("range withdrawn").unwrap();

        assert_eq!(
            state.assign("employee", Uuid::now_v7()),
            Err(LifecycleError::Retired)
        );
        assert_eq!(state.release(), Err(LifecycleError::Retired));
        assert_eq!(state.retire("again"), Err(LifecycleError::Retired));
        assert_eq!(state.status, LifecycleStatus::Retired);
    }

    #[test]
    fn test_statistics_invariant() {
        let stats = UsageStatistics::derive(10, 4, 3);
        assert_eq!(stats.available + stats.in_use + stats.retired, stats.total);
        assert_eq!(stats.available, 3);
    }

    #[test]
    fn test_statistics_clamp_at_zero() {
        let stats = UsageStatistics::derive(2, 3, 1);
        assert_eq!(stats.available, 0);
    }

    #[test]
    fn test_assignment_serde_tagging() {
        let assigned = Assignment::AssignedTo {
            kind: "employee".to_string(),
            id: Uuid::now_v7(),
        };
        let json = serde_json::to_value(&assigned).unwrap();
        assert_eq!(json["state"], "assigned_to");

        let unassigned = serde_json::to_value(Assignment::Unassigned).unwrap();
        assert_eq!(unassigned["state"], "unassigned");
    }
}
