//! Organization persistence seam
//!
//! This module provides the storage abstraction for organization nodes and
//! an in-memory implementation. The in-memory store is suitable for
//! single-process applications and testing; database-backed stores
//! implement the same trait.
//!
//! Multi-step mutations (`set_parent_and_order`, `set_sort_orders`,
//! `set_active`) are single trait methods so an implementation can apply
//! them in one transaction and no partial update is ever observable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrgError, OrgResult};
use crate::organization::Organization;

/// Storage abstraction for organization nodes.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Insert a new organization.
    ///
    /// Fails with [`OrgError::DuplicateCode`] if the short code is already
    /// taken by another organization.
    async fn insert(&self, org: Organization) -> OrgResult<()>;

    /// Look up an organization by id.
    async fn find(&self, id: Uuid) -> OrgResult<Option<Organization>>;

    /// Replace an existing organization.
    ///
    /// Fails with [`OrgError::NotFound`] if the id is unknown and
    /// [`OrgError::DuplicateCode`] if the new code collides.
    async fn update(&self, org: Organization) -> OrgResult<()>;

    /// List the direct children of a node, ordered by sort order.
    async fn list_children(&self, parent_id: Uuid) -> OrgResult<Vec<Organization>>;

    /// Atomically move a node under a new parent with the given sort order.
    async fn set_parent_and_order(
        &self,
        node_id: Uuid,
        parent_id: Uuid,
        sort_order: i32,
    ) -> OrgResult<()>;

    /// Atomically apply a batch of sibling sort orders.
    async fn set_sort_orders(&self, orders: &[(Uuid, i32)]) -> OrgResult<()>;

    /// Atomically set the active flag on a batch of nodes.
    async fn set_active(&self, ids: &[Uuid], active: bool) -> OrgResult<()>;
}

/// In-memory organization store.
///
/// All mutations run under a single write lock, which gives the same
/// all-or-nothing visibility a transactional database store provides.
pub struct MemoryOrganizationStore {
    nodes: Arc<RwLock<HashMap<Uuid, Organization>>>,
}

impl MemoryOrganizationStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryOrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryOrganizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryOrganizationStore").finish()
    }
}

fn code_taken(nodes: &HashMap<Uuid, Organization>, org: &Organization) -> bool {
    match &org.code {
        Some(code) => nodes
            .values()
            .any(|other| other.id != org.id && other.code.as_deref() == Some(code.as_str())),
        None => false,
    }
}

#[async_trait]
impl OrganizationStore for MemoryOrganizationStore {
    async fn insert(&self, org: Organization) -> OrgResult<()> {
        let mut nodes = self.nodes.write().await;
        if code_taken(&nodes, &org) {
            return Err(OrgError::DuplicateCode {
                code: org.code.clone().unwrap_or_default(),
            });
        }
        nodes.insert(org.id, org);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> OrgResult<Option<Organization>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn update(&self, mut org: Organization) -> OrgResult<()> {
        let mut nodes = self.nodes.write().await;
        if !nodes.contains_key(&org.id) {
            return Err(OrgError::NotFound { id: org.id });
        }
        if code_taken(&nodes, &org) {
            return Err(OrgError::DuplicateCode {
                code: org.code.clone().unwrap_or_default(),
            });
        }
        org.updated_at = Utc::now();
        nodes.insert(org.id, org);
        Ok(())
    }

    async fn list_children(&self, parent_id: Uuid) -> OrgResult<Vec<Organization>> {
        let nodes = self.nodes.read().await;
        let mut children: Vec<Organization> = nodes
            .values()
            .filter(|org| org.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by_key(|org| (org.sort_order, org.id));
        Ok(children)
    }

    async fn set_parent_and_order(
        &self,
        node_id: Uuid,
        parent_id: Uuid,
        sort_order: i32,
    ) -> OrgResult<()> {
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .get_mut(&node_id)
            .ok_or(OrgError::NotFound { id: node_id })?;
        node.parent_id = Some(parent_id);
        node.sort_order = sort_order;
        node.updated_at = Utc::now();
        Ok(())
    }

    async fn set_sort_orders(&self, orders: &[(Uuid, i32)]) -> OrgResult<()> {
        let mut nodes = self.nodes.write().await;
        // Validate the whole batch before touching anything.
        for (id, _) in orders {
            if !nodes.contains_key(id) {
                return Err(OrgError::NotFound { id: *id });
            }
        }
        let now = Utc::now();
        for (id, order) in orders {
            if let Some(node) = nodes.get_mut(id) {
                node.sort_order = *order;
                node.updated_at = now;
            }
        }
        Ok(())
    }

    async fn set_active(&self, ids: &[Uuid], active: bool) -> OrgResult<()> {
        let mut nodes = self.nodes.write().await;
        for id in ids {
            if !nodes.contains_key(id) {
                return Err(OrgError::NotFound { id: *id });
            }
        }
        let now = Utc::now();
        for id in ids {
            if let Some(node) = nodes.get_mut(id) {
                node.is_active = active;
                node.updated_at = now;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organization::OrgType;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryOrganizationStore::new();
        let org = Organization::new("Acme Corp").with_type(OrgType::Company);
        let id = org.id;

        store.insert(org).await.unwrap();
        let found = store.find(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let store = MemoryOrganizationStore::new();
        store
            .insert(Organization::new("First").with_code("ENG"))
            .await
            .unwrap();

        let result = store
            .insert(Organization::new("Second").with_code("ENG"))
            .await;
        assert!(matches!(result, Err(OrgError::DuplicateCode { .. })));
    }

    #[tokio::test]
    async fn test_children_sorted_by_order() {
        let store = MemoryOrganizationStore::new();
        let root = Organization::new("Root");
        let root_id = root.id;
        store.insert(root).await.unwrap();

        let b = Organization::new("B").with_parent(root_id).with_sort_order(1);
        let a = Organization::new("A").with_parent(root_id).with_sort_order(0);
        store.insert(b).await.unwrap();
        store.insert(a).await.unwrap();

        let children = store.list_children(root_id).await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_batch_rejects_unknown_id_without_partial_apply() {
        let store = MemoryOrganizationStore::new();
        let org = Organization::new("Only").with_sort_order(7);
        let id = org.id;
        store.insert(org).await.unwrap();

        let result = store
            .set_sort_orders(&[(id, 0), (Uuid::now_v7(), 1)])
            .await;
        assert!(matches!(result, Err(OrgError::NotFound { .. })));

        // The known node keeps its original order.
        let found = store.find(id).await.unwrap().unwrap();
        assert_eq!(found.sort_order, 7);
    }
}
