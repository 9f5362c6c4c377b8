//! Free host addresses between the stored addresses of a prefix.

use crate::models::{from_bits, to_bits, AddressFamily, Block, IpAddress};
use std::net::IpAddr;

/// Counts above this are shown as "Many".
pub const MANY_THRESHOLD: u128 = 65_536;

/// One row of an address listing.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressRow<'a> {
    Address(&'a IpAddress),
    /// `count` free addresses starting at `first`.
    Available { first: IpAddr, count: u128 },
}

impl AddressRow<'_> {
    /// Label for an available row, e.g. "12 IPs available" or "Many IPs available".
    pub fn available_label(count: u128) -> String {
        let plural = if count == 1 { "" } else { "s" };
        if count <= MANY_THRESHOLD {
            format!("{count} IP{plural} available")
        } else {
            "Many IPs available".to_string()
        }
    }
}

/// Usable address bounds of a prefix.
///
/// IPv4 prefixes shorter than /31 reserve their network and broadcast
/// addresses unless the prefix is a pool.
pub fn usable_bounds(block: Block, is_pool: bool) -> (u128, u128) {
    if block.family() == AddressFamily::V4 && block.prefix_len() < 31 && !is_pool {
        (block.lo() + 1, block.hi() - 1)
    } else {
        (block.lo(), block.hi())
    }
}

/// Interleave stored addresses of `block` with rows for the free addresses between them.
///
/// Addresses outside the usable part of the block are left out.
pub fn add_available_ips(block: Block, is_pool: bool, addresses: &[IpAddress]) -> Vec<AddressRow<'_>> {
    let family = block.family();
    let (first, last) = usable_bounds(block, is_pool);

    let mut inside: Vec<(u128, &IpAddress)> = addresses
        .iter()
        .filter_map(|a| {
            let (addr_family, bits) = to_bits(a.address);
            (addr_family == family && first <= bits && bits <= last).then_some((bits, a))
        })
        .collect();
    inside.sort_by_key(|(bits, a)| (*bits, a.id));

    let mut rows = Vec::with_capacity(inside.len() * 2 + 1);
    let mut next_free = Some(first);
    for (bits, address) in inside {
        if let Some(free) = next_free {
            if free < bits {
                rows.push(AddressRow::Available {
                    first: from_bits(family, free),
                    count: bits - free,
                });
            }
        }
        rows.push(AddressRow::Address(address));
        next_free = bits.checked_add(1);
    }
    if let Some(free) = next_free {
        if free <= last {
            rows.push(AddressRow::Available {
                first: from_bits(family, free),
                // Saturates only for the full IPv6 space.
                count: (last - free).saturating_add(1),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scope;

    fn address(id: u64, s: &str) -> IpAddress {
        IpAddress::new(id, s.parse().unwrap(), 24, Scope::Global)
    }

    fn summary(rows: &[AddressRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                AddressRow::Address(a) => a.address.to_string(),
                AddressRow::Available { first, count } => format!("{count}@{first}"),
            })
            .collect()
    }

    #[test]
    fn test_empty_prefix() {
        let block = Block::new("192.168.1.0/24").unwrap();
        assert_eq!(summary(&add_available_ips(block, false, &[])), vec!["254@192.168.1.1"]);
        assert_eq!(summary(&add_available_ips(block, true, &[])), vec!["256@192.168.1.0"]);
    }

    #[test]
    fn test_gaps_between_addresses() {
        let block = Block::new("192.168.1.0/24").unwrap();
        let addresses = vec![
            address(3, "192.168.1.10"),
            address(1, "192.168.1.1"),
            address(2, "192.168.1.2"),
            address(4, "10.0.0.1"),
        ];
        assert_eq!(
            summary(&add_available_ips(block, false, &addresses)),
            vec![
                "192.168.1.1",
                "192.168.1.2",
                "7@192.168.1.3",
                "192.168.1.10",
                "244@192.168.1.11",
            ]
        );
    }

    #[test]
    fn test_duplicate_addresses() {
        let block = Block::new("10.0.0.0/30").unwrap();
        let addresses = vec![address(1, "10.0.0.1"), address(2, "10.0.0.1")];
        assert_eq!(
            summary(&add_available_ips(block, false, &addresses)),
            vec!["10.0.0.1", "10.0.0.1", "1@10.0.0.2"]
        );
    }

    #[test]
    fn test_point_to_point() {
        let block = Block::new("10.0.0.0/31").unwrap();
        let addresses = vec![address(1, "10.0.0.0"), address(2, "10.0.0.1")];
        assert_eq!(
            summary(&add_available_ips(block, false, &addresses)),
            vec!["10.0.0.0", "10.0.0.1"]
        );
    }

    #[test]
    fn test_v6_and_label() {
        let block = Block::new("2001:db8::/64").unwrap();
        let rows = add_available_ips(block, false, &[]);
        assert_eq!(
            rows,
            vec![AddressRow::Available {
                first: "2001:db8::".parse().unwrap(),
                count: 1 << 64,
            }]
        );
        assert_eq!(AddressRow::available_label(1), "1 IP available");
        assert_eq!(AddressRow::available_label(65_536), "65536 IPs available");
        assert_eq!(AddressRow::available_label(1 << 64), "Many IPs available");
    }

    #[test]
    fn test_last_address_of_space() {
        let block = Block::new("255.255.255.254/31").unwrap();
        let addresses = vec![address(1, "255.255.255.255")];
        assert_eq!(
            summary(&add_available_ips(block, false, &addresses)),
            vec!["1@255.255.255.254", "255.255.255.255"]
        );
    }
}
