//! Organization tree traversal and mutation
//!
//! This module provides cycle-safe traversal and reshaping of the
//! organization forest. Traversals are iterative with an explicit visited
//! set and a bounded depth counter, so a corrupted (cyclic) persisted tree
//! can never cause unbounded work. Exceeding the depth guard is reported
//! as [`OrgError::TreeTooDeep`] rather than silently truncating, since a
//! truncated descendant set would corrupt tenant-isolation decisions.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{OrgError, OrgResult};
use crate::organization::Organization;
use crate::store::OrganizationStore;

/// Limits applied to tree traversals.
///
/// The depth guard is a defensive measure against data corruption, not a
/// normal termination condition: real organization trees are a handful of
/// levels deep.
#[derive(Debug, Clone, Copy)]
pub struct TraversalLimits {
    /// Maximum number of tree levels a traversal may cross
    pub max_depth: u32,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Cycle-safe view over the organization forest.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hr_org::{MemoryOrganizationStore, Organization, OrganizationStore, OrgTree};
///
/// # async fn example() -> Result<(), hr_org::OrgError> {
/// let store = Arc::new(MemoryOrganizationStore::new());
/// let tree = OrgTree::new(store.clone());
///
/// let root = Organization::new("Acme Corp");
/// let dept = Organization::new("Engineering").with_parent(root.id);
/// let root_id = root.id;
/// store.insert(root).await?;
/// store.insert(dept).await?;
///
/// let members = tree.descendants(root_id).await?;
/// assert_eq!(members.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OrgTree {
    store: Arc<dyn OrganizationStore>,
    limits: TraversalLimits,
}

impl std::fmt::Debug for OrgTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgTree")
            .field("limits", &self.limits)
            .finish()
    }
}

impl OrgTree {
    /// Create a tree view with default traversal limits.
    pub fn new(store: Arc<dyn OrganizationStore>) -> Self {
        Self::with_limits(store, TraversalLimits::default())
    }

    /// Create a tree view with custom traversal limits.
    pub fn with_limits(store: Arc<dyn OrganizationStore>, limits: TraversalLimits) -> Self {
        Self { store, limits }
    }

    /// Look up a single node.
    pub async fn node(&self, id: Uuid) -> OrgResult<Option<Organization>> {
        self.store.find(id).await
    }

    async fn require(&self, id: Uuid) -> OrgResult<Organization> {
        self.store
            .find(id)
            .await?
            .ok_or(OrgError::NotFound { id })
    }

    /// Collect the ids of every node below `node_id`, excluding the node
    /// itself.
    ///
    /// Breadth-first over children edges. A visited set guards against
    /// cyclic corruption; crossing more than `max_depth` levels fails with
    /// [`OrgError::TreeTooDeep`].
    pub async fn descendants(&self, node_id: Uuid) -> OrgResult<HashSet<Uuid>> {
        self.require(node_id).await?;
        self.walk_down(node_id).await
    }

    /// Collect the ids of every node below `node_id`, including the node
    /// itself.
    pub async fn descendants_including_self(&self, node_id: Uuid) -> OrgResult<HashSet<Uuid>> {
        let mut set = self.descendants(node_id).await?;
        set.insert(node_id);
        Ok(set)
    }

    async fn walk_down(&self, start: Uuid) -> OrgResult<HashSet<Uuid>> {
        let mut visited: HashSet<Uuid> = HashSet::new();
        visited.insert(start);
        let mut collected: HashSet<Uuid> = HashSet::new();
        let mut frontier = vec![start];
        let mut depth = 0u32;

        while !frontier.is_empty() {
            depth += 1;
            if depth > self.limits.max_depth {
                warn!(
                    node = %start,
                    limit = self.limits.max_depth,
                    "Descendant traversal exceeded depth guard"
                );
                return Err(OrgError::TreeTooDeep {
                    limit: self.limits.max_depth,
                });
            }

            let mut next = Vec::new();
            for id in frontier.drain(..) {
                for child in self.store.list_children(id).await? {
                    if visited.insert(child.id) {
                        collected.insert(child.id);
                        next.push(child.id);
                    }
                }
            }
            frontier = next;
        }

        Ok(collected)
    }

    /// Collect the ancestors of `node_id`, root-first, excluding the node
    /// itself.
    ///
    /// Walks parent links upward. A cycle in the parent chain or a chain
    /// longer than `max_depth` fails with [`OrgError::TreeTooDeep`]; a
    /// dangling parent pointer fails with [`OrgError::NotFound`].
    pub async fn ancestors(&self, node_id: Uuid) -> OrgResult<Vec<Uuid>> {
        let mut node = self.require(node_id).await?;
        let mut seen: HashSet<Uuid> = HashSet::new();
        seen.insert(node_id);
        let mut chain = Vec::new();

        while let Some(parent_id) = node.parent_id {
            if chain.len() as u32 >= self.limits.max_depth || !seen.insert(parent_id) {
                warn!(
                    node = %node_id,
                    limit = self.limits.max_depth,
                    "Ancestor walk exceeded depth guard"
                );
                return Err(OrgError::TreeTooDeep {
                    limit: self.limits.max_depth,
                });
            }
            chain.push(parent_id);
            node = self.require(parent_id).await?;
        }

        chain.reverse();
        Ok(chain)
    }

    /// Check whether moving `node_id` under `proposed_parent_id` would
    /// make the node its own ancestor.
    ///
    /// True iff the proposed parent is the node itself or one of its
    /// descendants.
    pub async fn would_create_cycle(
        &self,
        node_id: Uuid,
        proposed_parent_id: Uuid,
    ) -> OrgResult<bool> {
        if node_id == proposed_parent_id {
            return Ok(true);
        }
        let below = self.descendants(node_id).await?;
        Ok(below.contains(&proposed_parent_id))
    }

    /// Move a node under a new parent.
    ///
    /// The node is placed last among its new siblings. Fails with
    /// [`OrgError::CycleDetected`] if the move would create a cycle; the
    /// tree is left unchanged in that case.
    pub async fn reparent(&self, node_id: Uuid, new_parent_id: Uuid) -> OrgResult<()> {
        self.require(node_id).await?;
        self.require(new_parent_id).await?;

        if self.would_create_cycle(node_id, new_parent_id).await? {
            return Err(OrgError::CycleDetected {
                node: node_id,
                proposed_parent: new_parent_id,
            });
        }

        let siblings = self.store.list_children(new_parent_id).await?;
        let next_order = siblings
            .iter()
            .filter(|s| s.id != node_id)
            .map(|s| s.sort_order)
            .max()
            .map_or(0, |order| order + 1);

        self.store
            .set_parent_and_order(node_id, new_parent_id, next_order)
            .await?;
        info!(node = %node_id, parent = %new_parent_id, sort_order = next_order, "Reparented organization");
        Ok(())
    }

    /// Renumber the children of `parent_id` to match `ordered_ids`.
    ///
    /// The batch must be a permutation of the node's current children;
    /// anything else fails with [`OrgError::SiblingMismatch`]. Orders are
    /// applied atomically so no duplicate positions are ever visible.
    pub async fn reorder(&self, parent_id: Uuid, ordered_ids: &[Uuid]) -> OrgResult<()> {
        self.require(parent_id).await?;
        let children = self.store.list_children(parent_id).await?;

        let current: HashSet<Uuid> = children.iter().map(|c| c.id).collect();
        let proposed: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if current != proposed || ordered_ids.len() != children.len() {
            return Err(OrgError::SiblingMismatch { parent: parent_id });
        }

        let orders: Vec<(Uuid, i32)> = ordered_ids
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position as i32))
            .collect();
        self.store.set_sort_orders(&orders).await?;
        info!(parent = %parent_id, count = orders.len(), "Reordered organization siblings");
        Ok(())
    }

    /// Soft-deactivate a single node.
    pub async fn deactivate(&self, node_id: Uuid) -> OrgResult<()> {
        self.require(node_id).await?;
        self.store.set_active(&[node_id], false).await
    }

    /// Soft-deactivate a node and its entire descendant closure in one
    /// batch.
    pub async fn deactivate_subtree(&self, node_id: Uuid) -> OrgResult<()> {
        let members = self.descendants_including_self(node_id).await?;
        let ids: Vec<Uuid> = members.into_iter().collect();
        self.store.set_active(&ids, false).await?;
        info!(node = %node_id, count = ids.len(), "Deactivated organization subtree");
        Ok(())
    }
}
