//! Address range domain models
//!
//! A range is the IP-flavored counterpart of an allocation category: a
//! tenant-scoped pool of issuable identifiers, here an inclusive interval
//! of IPv4 addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::addr::{count_in_range, to_address, to_integer};
use crate::error::IpamResult;

/// A tenant-scoped IPv4 address pool.
///
/// The `address_count` is derived from the interval at construction time;
/// a range whose end precedes its start is valid and simply has zero
/// capacity.
///
/// # Examples
///
/// ```
/// use hr_ipam::AddressRange;
/// use uuid::Uuid;
///
/// let range = AddressRange::new(
///     Uuid::now_v7(),
///     "192.168.1.1",
///     "192.168.1.100",
///     "Office workstations",
/// )
/// .unwrap();
/// assert_eq!(range.address_count, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressRange {
    /// Unique identifier for the range
    pub id: Uuid,

    /// Tenant root organization this range belongs to
    pub tenant_id: Uuid,

    /// First address in the range (inclusive, canonical dotted-decimal)
    pub start: String,

    /// Last address in the range (inclusive, canonical dotted-decimal)
    pub end: String,

    /// Optional subnet mask (e.g. `255.255.255.0`)
    pub subnet: Option<String>,

    /// Optional gateway address
    pub gateway: Option<String>,

    /// Human-readable label
    pub label: String,

    /// Number of addresses in the interval, derived from start and end
    pub address_count: u64,

    /// When the range was created
    pub created_at: DateTime<Utc>,

    /// When the range was last updated
    pub updated_at: DateTime<Utc>,
}

impl AddressRange {
    /// Creates a new range over the inclusive interval `[start, end]`.
    ///
    /// Both endpoints are validated and stored in canonical
    /// dotted-decimal form.
    ///
    /// # Errors
    ///
    /// [`crate::IpamError::InvalidAddressFormat`] if either endpoint is
    /// malformed.
    pub fn new(
        tenant_id: Uuid,
        start: &str,
        end: &str,
        label: impl Into<String>,
    ) -> IpamResult<Self> {
        let start_value = to_integer(start)?;
        let end_value = to_integer(end)?;
        let address_count = count_in_range(start, end)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            tenant_id,
            start: to_address(start_value),
            end: to_address(end_value),
            subnet: None,
            gateway: None,
            label: label.into(),
            address_count,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the subnet mask.
    pub fn with_subnet(mut self, subnet: impl Into<String>) -> Self {
        self.subnet = Some(subnet.into());
        self
    }

    /// Set the gateway address.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }
}
