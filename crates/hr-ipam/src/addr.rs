//! IPv4 address arithmetic
//!
//! Pure, stateless conversions between dotted-decimal strings and their
//! 32-bit integer representation. Everything else in this crate compares
//! and iterates addresses through these functions.

use crate::error::{IpamError, IpamResult};

/// Convert a dotted-decimal address to its 32-bit value.
///
/// # Errors
///
/// [`IpamError::InvalidAddressFormat`] unless the input is exactly four
/// numeric octets, each in [0, 255].
///
/// # Examples
///
/// ```
/// use hr_ipam::addr::to_integer;
///
/// assert_eq!(to_integer("192.168.1.1").unwrap(), 3232235777);
/// assert!(to_integer("192.168.1").is_err());
/// assert!(to_integer("192.168.1.256").is_err());
/// ```
pub fn to_integer(address: &str) -> IpamResult<u32> {
    let invalid = || IpamError::InvalidAddressFormat {
        address: address.to_string(),
    };

    let octets: Vec<&str> = address.trim().split('.').collect();
    if octets.len() != 4 {
        return Err(invalid());
    }

    let mut value: u32 = 0;
    for octet in octets {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let parsed: u32 = octet.parse().map_err(|_| invalid())?;
        if parsed > 255 {
            return Err(invalid());
        }
        value = (value << 8) | parsed;
    }
    Ok(value)
}

/// Convert a 32-bit value back to dotted-decimal form.
///
/// # Examples
///
/// ```
/// use hr_ipam::addr::to_address;
///
/// assert_eq!(to_address(3232235777), "192.168.1.1");
/// ```
pub fn to_address(value: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (value >> 24) & 0xFF,
        (value >> 16) & 0xFF,
        (value >> 8) & 0xFF,
        value & 0xFF
    )
}

/// Number of addresses in the inclusive interval `[start, end]`.
///
/// An interval with `end` before `start` is valid input and has zero
/// capacity; it is not an error.
///
/// # Examples
///
/// ```
/// use hr_ipam::addr::count_in_range;
///
/// assert_eq!(count_in_range("192.168.1.1", "192.168.1.100").unwrap(), 100);
/// assert_eq!(count_in_range("192.168.1.100", "192.168.1.1").unwrap(), 0);
/// ```
pub fn count_in_range(start: &str, end: &str) -> IpamResult<u64> {
    let start = to_integer(start)?;
    let end = to_integer(end)?;
    if end < start {
        return Ok(0);
    }
    Ok(u64::from(end) - u64::from(start) + 1)
}

/// Check whether an address lies inside the inclusive interval
/// `[start, end]`, comparing 32-bit values.
pub fn is_within_range(address: &str, start: &str, end: &str) -> IpamResult<bool> {
    let address = to_integer(address)?;
    let start = to_integer(start)?;
    let end = to_integer(end)?;
    Ok(start <= address && address <= end)
}
