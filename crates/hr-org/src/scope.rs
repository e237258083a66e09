//! Tenant scoping
//!
//! This module provides the authorization layer every other domain calls
//! to scope queries and verify ownership. A tenant is a marked
//! organization: the root node referenced by a company record. Membership
//! in the transitive closure of that root (root included) is what
//! "belongs to this tenant" means.
//!
//! Scoping fails closed: if the tenant root is missing or deactivated the
//! computed member set is empty and every scoped query returns nothing.
//! An unscoped result is never produced.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::OrgResult;
use crate::tree::OrgTree;

/// Memoizing tenant-boundary resolver.
///
/// Wraps [`OrgTree::descendants_including_self`] with a per-root cache.
/// Cached sets may go stale after tree mutations; callers that mutate the
/// tree must call [`invalidate`](Self::invalidate) (staleness only affects
/// advisory reads, and mutation paths re-verify ownership at the point of
/// write).
pub struct TenantGate {
    tree: OrgTree,
    cache: RwLock<HashMap<Uuid, Arc<HashSet<Uuid>>>>,
}

impl std::fmt::Debug for TenantGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantGate").finish()
    }
}

impl TenantGate {
    /// Create a gate over the given tree view.
    pub fn new(tree: OrgTree) -> Self {
        Self {
            tree,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the member set of a tenant: the root organization plus its
    /// full descendant closure.
    ///
    /// Returns an empty set when the root is missing or deactivated.
    /// Empty results are not cached, so a tenant becomes visible as soon
    /// as its root is (re)activated.
    pub async fn descendants_of(&self, tenant_root_id: Uuid) -> OrgResult<Arc<HashSet<Uuid>>> {
        if let Some(members) = self.cache.read().await.get(&tenant_root_id) {
            return Ok(members.clone());
        }

        let root = self.tree.node(tenant_root_id).await?;
        let usable = root.map(|org| org.is_active).unwrap_or(false);
        if !usable {
            warn!(
                tenant_root = %tenant_root_id,
                "Tenant root missing or deactivated; scoping fails closed"
            );
            return Ok(Arc::new(HashSet::new()));
        }

        let members = Arc::new(
            self.tree
                .descendants_including_self(tenant_root_id)
                .await?,
        );
        debug!(
            tenant_root = %tenant_root_id,
            members = members.len(),
            "Computed tenant member set"
        );
        self.cache
            .write()
            .await
            .insert(tenant_root_id, members.clone());
        Ok(members)
    }

    /// Check whether an organization node belongs to a tenant.
    pub async fn verify_ownership(&self, node_id: Uuid, tenant_root_id: Uuid) -> OrgResult<bool> {
        Ok(self.descendants_of(tenant_root_id).await?.contains(&node_id))
    }

    /// Build a reusable filter restricting resources to one tenant.
    pub async fn scope_filter(&self, tenant_root_id: Uuid) -> OrgResult<TenantScope> {
        Ok(TenantScope {
            tenant_root_id,
            members: self.descendants_of(tenant_root_id).await?,
        })
    }

    /// Drop the cached member set for one tenant root.
    pub async fn invalidate(&self, tenant_root_id: Uuid) {
        self.cache.write().await.remove(&tenant_root_id);
    }

    /// Drop every cached member set.
    pub async fn invalidate_all(&self) {
        self.cache.write().await.clear();
    }
}

/// A resolved tenant boundary, usable to restrict arbitrary queries.
///
/// When the member set is empty (root missing or deactivated) the scope
/// matches nothing.
#[derive(Debug, Clone)]
pub struct TenantScope {
    tenant_root_id: Uuid,
    members: Arc<HashSet<Uuid>>,
}

impl TenantScope {
    /// The tenant root this scope was built for.
    pub fn tenant_root_id(&self) -> Uuid {
        self.tenant_root_id
    }

    /// Check whether an organization id falls inside the tenant.
    pub fn contains(&self, org_id: Uuid) -> bool {
        self.members.contains(&org_id)
    }

    /// Check whether the scope matches nothing.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of organization nodes inside the tenant.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Restrict a result set to items whose organization id falls inside
    /// the tenant.
    pub fn filter<T, F>(&self, items: Vec<T>, org_id: F) -> Vec<T>
    where
        F: Fn(&T) -> Uuid,
    {
        items
            .into_iter()
            .filter(|item| self.contains(org_id(item)))
            .collect()
    }
}
