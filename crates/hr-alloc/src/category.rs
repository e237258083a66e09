//! Allocation category domain models
//!
//! A category is a named sequence space scoped to one tenant: "employee
//! numbers for Acme", "asset numbers for Initech". The persisted
//! `sequence` field is the high-water mark of issued values; it is only
//! ever advanced through the store's compare-and-swap primitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AllocError, AllocResult};

/// What kind of identifier a category issues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Employee numbers (e.g. `ACME-EMP-0042`)
    EmployeeNumber,

    /// Asset numbers (e.g. `ACME-AST-0007`)
    AssetNumber,
}

/// A named, tenant-scoped sequence space.
///
/// Uniqueness of `(tenant_id, kind, code)` is enforced by the category
/// store. Categories are never deleted while allocation records reference
/// them.
///
/// # Examples
///
/// ```
/// use hr_alloc::{AllocationCategory, CategoryKind};
/// use uuid::Uuid;
///
/// let tenant = Uuid::now_v7();
/// let category =
///     AllocationCategory::new(tenant, CategoryKind::EmployeeNumber, "EMP", "Employee numbers")
///         .unwrap();
/// assert_eq!(category.sequence, 0);
/// assert!(category.is_active);
///
/// // Codes are 2-6 alphanumeric characters.
/// assert!(AllocationCategory::new(tenant, CategoryKind::AssetNumber, "X", "too short").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationCategory {
    /// Unique identifier for the category
    pub id: Uuid,

    /// Tenant root organization this category belongs to
    pub tenant_id: Uuid,

    /// What kind of identifier this category issues
    pub kind: CategoryKind,

    /// Short code rendered into issued identifiers (2-6 alphanumerics)
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Highest sequence value issued so far; 0 means nothing issued yet
    pub sequence: u64,

    /// Whether the category may issue new identifiers
    pub is_active: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last updated
    pub updated_at: DateTime<Utc>,
}

impl AllocationCategory {
    /// Creates a new active category with its counter at zero.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidCategoryCode`] unless the code is 2-6 ASCII
    /// alphanumeric characters.
    pub fn new(
        tenant_id: Uuid,
        kind: CategoryKind,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> AllocResult<Self> {
        let code = code.into();
        validate_code(&code)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            tenant_id,
            kind,
            code,
            name: name.into(),
            sequence: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Deactivate the category; issuing from it then fails with
    /// `CategoryInactive`.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate the category.
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }
}

fn validate_code(code: &str) -> AllocResult<()> {
    let len = code.chars().count();
    if !(2..=6).contains(&len) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AllocError::InvalidCategoryCode {
            code: code.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation() {
        let tenant = Uuid::now_v7();
        let category =
            AllocationCategory::new(tenant, CategoryKind::EmployeeNumber, "EMP", "Employees")
                .unwrap();

        assert_eq!(category.tenant_id, tenant);
        assert_eq!(category.code, "EMP");
        assert_eq!(category.sequence, 0);
        assert!(category.is_active);
    }

    #[test]
    fn test_code_length_bounds() {
        let tenant = Uuid::now_v7();
        for code in ["AB", "ABCDEF", "NB", "A1"] {
            assert!(
                AllocationCategory::new(tenant, CategoryKind::AssetNumber, code, "ok").is_ok(),
                "code {code:?} should be accepted"
            );
        }
        for code in ["A", "ABCDEFG", "", "A-B", "A B", "ÉMP"] {
            assert!(
                AllocationCategory::new(tenant, CategoryKind::AssetNumber, code, "bad").is_err(),
                "code {code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deactivate_and_activate() {
        let mut category = AllocationCategory::new(
            Uuid::now_v7(),
            CategoryKind::AssetNumber,
            "AST",
            "Assets",
        )
        .unwrap();

        category.deactivate();
        assert!(!category.is_active);
        category.activate();
        assert!(category.is_active);
    }
}
