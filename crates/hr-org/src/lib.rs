//! # Organization Hierarchy & Tenant Scoping
//!
//! This crate provides the organizational backbone of the Atrium HR
//! platform: a forest of organization trees, cycle-safe traversal and
//! reshaping, and the tenant gate every other domain calls to decide
//! whether a resource belongs to a tenant.
//!
//! ## Overview
//!
//! - **Organizations**: hierarchy nodes with a type tag, short code, sort
//!   order, and soft deactivation
//! - **OrgTree**: descendant/ancestor traversal with depth and cycle
//!   guards, reparenting, sibling reordering, cascaded deactivation
//! - **TenantGate**: memoized tenant-membership decisions and fail-closed
//!   query scoping
//!
//! ## Architecture
//!
//! ```text
//! TenantGate (memoized member sets, fail closed)
//!     └─ OrgTree (BFS traversal, cycle + depth guards)
//!          └─ OrganizationStore (trait; in-memory impl provided)
//!               └─ Organization (tree node)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hr_org::{
//!     MemoryOrganizationStore, Organization, OrganizationStore, OrgTree, OrgType, TenantGate,
//! };
//!
//! # async fn example() -> Result<(), hr_org::OrgError> {
//! let store = Arc::new(MemoryOrganizationStore::new());
//! let tree = OrgTree::new(store.clone());
//! let gate = TenantGate::new(tree.clone());
//!
//! let root = Organization::new("Acme Corp").with_type(OrgType::Company);
//! let tenant_root_id = root.id;
//! let dept = Organization::new("Engineering").with_parent(root.id);
//! let dept_id = dept.id;
//! store.insert(root).await?;
//! store.insert(dept).await?;
//!
//! assert!(gate.verify_ownership(dept_id, tenant_root_id).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `hr-alloc`: identifier allocation scoped by tenant
//! - `hr-ipam`: IP address allocation scoped by tenant

pub mod error;
pub mod organization;
pub mod scope;
pub mod store;
pub mod tree;

// Re-export main types for convenience
pub use error::{OrgError, OrgResult};
pub use organization::{Organization, OrgType};
pub use scope::{TenantGate, TenantScope};
pub use store::{MemoryOrganizationStore, OrganizationStore};
pub use tree::{OrgTree, TraversalLimits};
