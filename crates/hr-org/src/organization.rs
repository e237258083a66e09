//! Organization domain models
//!
//! This module provides the core Organization entity. Organizations form a
//! forest of trees; the root organization referenced by a company record
//! anchors that company's tenant boundary, and the transitive closure of
//! its children defines what "belongs to" the tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structural classification of an organization node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    /// Tenant root entity
    Company,

    /// Major business unit below the company
    Division,

    /// Department within a division
    Department,

    /// Smallest grouping of employees
    Team,
}

/// A node in the organization forest.
///
/// Every resource on the platform is scoped to a tenant by checking whether
/// its organization id falls inside the descendant closure of the tenant's
/// root organization.
///
/// # Examples
///
/// ```
/// use hr_org::{Organization, OrgType};
///
/// let root = Organization::new("Acme Corp")
///     .with_type(OrgType::Company)
///     .with_code("ACME");
/// assert!(root.is_active);
/// assert!(root.parent_id.is_none());
///
/// let dept = Organization::new("Engineering")
///     .with_type(OrgType::Department)
///     .with_parent(root.id);
/// assert_eq!(dept.parent_id, Some(root.id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: Uuid,

    /// Human-readable name
    pub name: String,

    /// Optional short code, unique across the platform (e.g. `ACME-ENG`)
    pub code: Option<String>,

    /// Structural type of this node
    pub org_type: OrgType,

    /// Parent organization, `None` for forest roots
    pub parent_id: Option<Uuid>,

    /// Position among siblings
    pub sort_order: i32,

    /// Whether the organization is active (deactivation is soft; nodes are
    /// never physically removed)
    pub is_active: bool,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Creates a new active root-level organization.
    ///
    /// The organization is created with:
    /// - A newly generated UUID v7 ID
    /// - `Department` type (override with [`with_type`](Self::with_type))
    /// - No parent and sort order 0
    /// - Active status
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            code: None,
            org_type: OrgType::Department,
            parent_id: None,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the globally unique short code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the structural type.
    pub fn with_type(mut self, org_type: OrgType) -> Self {
        self.org_type = org_type;
        self
    }

    /// Place the organization under a parent node.
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the position among siblings.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Check whether this node is a forest root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_creation() {
        let org = Organization::new("Acme Corp");

        assert_eq!(org.name, "Acme Corp");
        assert!(org.code.is_none());
        assert!(org.is_active);
        assert!(org.is_root());
        assert_eq!(org.sort_order, 0);
    }

    #[test]
    fn test_builder_methods() {
        let parent = Uuid::now_v7();
        let org = Organization::new("Platform Team")
            .with_type(OrgType::Team)
            .with_code("PLAT")
            .with_parent(parent)
            .with_sort_order(3);

        assert_eq!(org.org_type, OrgType::Team);
        assert_eq!(org.code.as_deref(), Some("PLAT"));
        assert_eq!(org.parent_id, Some(parent));
        assert_eq!(org.sort_order, 3);
        assert!(!org.is_root());
    }
}
